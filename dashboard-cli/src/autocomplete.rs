use dashboard_core::{RecentCities, SuggestionMatcher};
use inquire::{
    CustomUserError,
    autocompletion::{Autocomplete, Replacement},
};

/// Feeds matcher suggestions to the prompt; recent cities while the input is empty.
#[derive(Debug, Clone)]
pub struct CityAutocomplete {
    matcher: SuggestionMatcher,
    recent: Vec<String>,
}

impl CityAutocomplete {
    pub fn new(matcher: SuggestionMatcher, recent: &RecentCities) -> Self {
        Self { matcher, recent: recent.as_slice().to_vec() }
    }

    fn suggestions(&self, input: &str) -> Vec<String> {
        if input.trim().is_empty() {
            self.recent.clone()
        } else {
            self.matcher.suggest(input)
        }
    }
}

impl Autocomplete for CityAutocomplete {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        Ok(self.suggestions(input))
    }

    fn get_completion(
        &mut self,
        input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        Ok(highlighted_suggestion.or_else(|| self.suggestions(input).into_iter().next()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::Catalog;

    fn autocomplete() -> CityAutocomplete {
        let matcher = SuggestionMatcher::new(&Catalog::new(["Paris", "Sparta", "Rome"]));
        let recent = RecentCities::new().record("Oslo").record("Lima");
        CityAutocomplete::new(matcher, &recent)
    }

    #[test]
    fn empty_input_offers_recent_cities() {
        let mut ac = autocomplete();
        assert_eq!(ac.get_suggestions("  ").unwrap(), vec!["Lima", "Oslo"]);
    }

    #[test]
    fn typed_input_uses_matcher() {
        let mut ac = autocomplete();
        assert_eq!(ac.get_suggestions("par").unwrap(), vec!["Paris", "Sparta"]);
        assert!(ac.get_suggestions("p").unwrap().is_empty());
    }

    #[test]
    fn completion_defaults_to_first_suggestion() {
        let mut ac = autocomplete();
        assert_eq!(ac.get_completion("par", None).unwrap(), Some("Paris".to_string()));
        assert_eq!(
            ac.get_completion("par", Some("Sparta".to_string())).unwrap(),
            Some("Sparta".to_string())
        );
        assert_eq!(ac.get_completion("zz", None).unwrap(), None);
    }
}
