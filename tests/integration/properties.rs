use proptest::prelude::*;
use tsukimi_patcher::css::{ensure_root_comment, patch_root_variables, PropertyEdit};
use tsukimi_patcher::json::{ensure_valid, upsert_variation, VariationObject};
use tsukimi_patcher::snippet::{insert_snippet, Snippet};
use tsukimi_patcher::{Document, Palette};

const COMMENT: &str = "Tsukimi-inspired palette";

fn rgb() -> impl Strategy<Value = String> {
    (0u8..=255, 0u8..=255, 0u8..=255).prop_map(|(r, g, b)| format!("{r},{g},{b}"))
}

/// Free text that cannot open or close a CSS block or comment.
fn filler() -> impl Strategy<Value = String> {
    "[a-z .;#\n]{0,40}"
}

fn root_values() -> Vec<PropertyEdit> {
    vec![
        PropertyEdit::new("focus", "205,177,149"),
        PropertyEdit::new("white", "240,235,229"),
    ]
}

fn patch_css(doc: &Document) -> Document {
    let (patched, _) = patch_root_variables(doc, &root_values()).unwrap();
    ensure_root_comment(&patched.document, "focus", COMMENT)
        .unwrap()
        .document
}

proptest! {
    #[test]
    fn root_patch_is_idempotent_and_scoped(
        prefix in filler(),
        suffix in filler(),
        focus in rgb(),
        white05 in rgb(),
    ) {
        let root = format!(
            ":root {{\n  --focus: {focus};\n  --white05: {white05};\n  --white: 1,1,1;\n}}\n"
        );
        let text = format!("{prefix}\n{root}{suffix}");
        let doc = Document::new(text.as_str());

        let once = patch_css(&doc);
        let twice = patch_css(&once);
        prop_assert_eq!(&once, &twice);

        let out = once.as_str();
        let expected_prefix = format!("{prefix}\n:root {{\n");
        prop_assert!(out.starts_with(&expected_prefix));
        let expected_suffix = format!("}}\n{suffix}");
        prop_assert!(out.ends_with(&expected_suffix));
        prop_assert!(out.contains("  /* Tsukimi-inspired palette */\n  --focus: 205,177,149;\n"));
        // `--white` must not bleed into `--white05`.
        let white05_line = format!("  --white05: {white05};\n");
        prop_assert!(out.contains(&white05_line));
        prop_assert!(out.contains("  --white: 240,235,229;\n"));
    }

    #[test]
    fn snippet_is_inserted_once(body in "[a-z{}; \n]{0,60}", marked in any::<bool>()) {
        let text = if marked {
            format!("{body}\n/* Metro White: x */\n")
        } else {
            body
        };
        let snippet = Snippet::from_palette(&Palette::tsukimi());
        let once = insert_snippet(&Document::new(text.as_str()), &snippet).unwrap();
        prop_assert!(once.changed);
        let twice = insert_snippet(&once.document, &snippet).unwrap();
        prop_assert!(!twice.changed);
        prop_assert_eq!(once.document.as_str().matches(&snippet.sentinel).count(), 1);
    }

    #[test]
    fn variation_upsert_keeps_json_valid(
        siblings in proptest::collection::vec("[A-Z][a-z]{2,8}", 0..4),
        midnight_last in any::<bool>(),
        focus in rgb(),
    ) {
        let siblings: Vec<String> = siblings
            .into_iter()
            .filter(|s| !["Midnight", "Tsukimi", "Variation"].contains(&s.as_str()))
            .collect();
        let midnight = format!("    \"Midnight\": {{\n      \"--focus\": [\"{focus}\", \"all\"]\n    }}");
        let mut members: Vec<String> = siblings
            .iter()
            .map(|name| format!("    \"{name}\": {{}}"))
            .collect();
        if midnight_last {
            members.push(midnight.clone());
        } else {
            members.insert(0, midnight.clone());
        }
        let text = format!("{{\n  \"Variation\": {{\n{}\n  }}\n}}\n", members.join(",\n"));
        prop_assume!(ensure_valid(&text).is_ok());

        let variation = VariationObject::from_palette(&Palette::tsukimi());
        let doc = Document::new(text.as_str());
        let once = upsert_variation(&doc, "Variation", "Midnight", &variation).unwrap();
        prop_assert!(once.changed);
        prop_assert!(ensure_valid(once.document.as_str()).is_ok());
        prop_assert!(once.document.as_str().contains(&midnight));

        let twice = upsert_variation(&once.document, "Variation", "Midnight", &variation).unwrap();
        prop_assert!(!twice.changed);
    }
}
