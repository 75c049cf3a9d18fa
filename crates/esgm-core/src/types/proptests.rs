//! Property tests for criteria-derived input kinds.

#[cfg(test)]
mod tests {
    use crate::types::{InputType, Pillar};
    use proptest::prelude::*;
    use serde_json::json;

    proptest! {
        #[test]
        fn options_array_always_renders_dropdown(options in prop::collection::vec("[ -~]{0,16}", 0..8)) {
            let (kind, derived) = InputType::from_criteria(&json!({ "options": options }));
            prop_assert_eq!(kind, InputType::Dropdown);
            prop_assert_eq!(derived, options);
        }

        #[test]
        fn unknown_declared_type_is_text(kind in "[a-z]{1,12}") {
            prop_assume!(kind != "numeric" && kind != "dropdown");
            let (derived, options) = InputType::from_criteria(&json!({ "type": kind }));
            prop_assert_eq!(derived, InputType::Text);
            prop_assert!(options.is_empty());
        }

        #[test]
        fn pillar_labels_parse_back(index in 0usize..3) {
            let pillar = Pillar::ALL[index];
            prop_assert_eq!(pillar.as_str().parse::<Pillar>().ok(), Some(pillar));
        }
    }
}
