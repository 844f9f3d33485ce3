//! Property tests for extraction and rewriting invariants.

use std::collections::HashSet;

use proptest::prelude::*;
use rigger_engine::css::classify::ALLOWED_PROPERTIES;
use rigger_engine::css::walker;
use rigger_engine::text::stable_hash;
use rigger_engine::{
    build_root_block, extract_tokens, inject_root_block, rewrite, scan_stylesheet, Overrides,
    Parameter, BLOCK_END, BLOCK_START,
};

const SELECTORS: &[&str] = &["h1", ".card", ":root", "a:hover", "body > p", "#main .x"];
const PROPERTIES: &[&str] = &[
    "color",
    "background-color",
    "font-size",
    "line-height",
    "margin",
    "padding-left",
    "border-radius",
    "box-shadow",
    "transition",
    "width",
    "display",
    "font-family",
    "--custom",
];
const VALUES: &[&str] = &[
    "#fff",
    "#ff0000",
    "12px",
    "1.5",
    "0 auto",
    "rgba(0,0,0,.5)",
    "calc(1px + 2px)",
    "-0.05em",
    "ease-in 200ms",
    "var(--x)",
];

fn stylesheet() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (
            0..SELECTORS.len(),
            prop::collection::vec((0..PROPERTIES.len(), 0..VALUES.len()), 1..4),
        ),
        0..24,
    )
    .prop_map(|rules| {
        rules
            .into_iter()
            .map(|(selector, decls)| {
                let body: Vec<String> = decls
                    .into_iter()
                    .map(|(p, v)| format!("{}: {};", PROPERTIES[p], VALUES[v]))
                    .collect();
                format!("{} {{ {} }}", SELECTORS[selector], body.join(" "))
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}

/// Applies replacements front to back, tracking the running shift.
fn ascending_replay(content: &str, params: &[Parameter]) -> String {
    let mut spans: Vec<(usize, usize, &str)> = params
        .iter()
        .filter_map(|p| p.source.span().map(|(s, e)| (s, e, p.css_var.as_str())))
        .collect();
    spans.sort_by_key(|&(start, _, _)| start);

    let mut out = String::new();
    let mut cursor = 0;
    for (start, end, var) in spans {
        out.push_str(&content[cursor..start]);
        out.push_str(&format!("var({})", var));
        cursor = end;
    }
    out.push_str(&content[cursor..]);
    out
}

proptest! {
    #[test]
    fn scanning_is_deterministic(css in stylesheet()) {
        let first = scan_stylesheet(&css, "a.css");
        let second = scan_stylesheet(&css, "a.css");
        let ids = |params: &[Parameter]| -> Vec<(String, String)> {
            params.iter().map(|p| (p.id.clone(), p.css_var.clone())).collect()
        };
        prop_assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn only_allowed_properties_are_extracted(css in stylesheet()) {
        for param in scan_stylesheet(&css, "a.css") {
            prop_assert!(ALLOWED_PROPERTIES.contains(&param.source.property.as_str()));
            prop_assert!(!param.source.value.starts_with("var("));
        }
    }

    #[test]
    fn ids_and_vars_are_unique(css in stylesheet()) {
        let params = scan_stylesheet(&css, "a.css");
        let ids: HashSet<_> = params.iter().map(|p| &p.id).collect();
        let vars: HashSet<_> = params.iter().map(|p| &p.css_var).collect();
        prop_assert_eq!(ids.len(), params.len());
        prop_assert_eq!(vars.len(), params.len());
    }

    #[test]
    fn identical_declarations_collapse(
        selector in 0..SELECTORS.len(),
        property in 0..9usize,
        value in 0..9usize,
        copies in 2..5usize,
    ) {
        let rule = format!("{} {{ {}: {}; }}", SELECTORS[selector], PROPERTIES[property], VALUES[value]);
        let css = vec![rule; copies].join("\n");
        prop_assert_eq!(scan_stylesheet(&css, "d.css").len(), 1);
    }

    #[test]
    fn spans_cover_the_value_text(css in stylesheet()) {
        for param in scan_stylesheet(&css, "a.css") {
            let (start, end) = param.source.span().unwrap();
            prop_assert_eq!(&css[start..end], param.source.value.as_str());
        }
    }

    #[test]
    fn descending_rewrite_matches_ascending_replay(
        css in stylesheet(),
        mask in prop::collection::vec(any::<bool>(), 64),
    ) {
        let all = scan_stylesheet(&css, "a.css");
        let subset: Vec<Parameter> = all
            .into_iter()
            .zip(mask.into_iter().cycle())
            .filter_map(|(param, keep)| keep.then_some(param))
            .collect();

        let overrides = Overrides::new();
        let rewritten = rewrite(&css, &subset, &overrides);
        let expected = inject_root_block(
            &ascending_replay(&css, &subset),
            &build_root_block(&subset, &overrides),
        );
        prop_assert_eq!(&rewritten, &expected);
        if walker::declarations(&css).is_some() {
            prop_assert!(walker::declarations(&rewritten).is_some());
        }

        for param in &subset {
            let reference = format!("var({})", param.css_var);
            prop_assert_eq!(rewritten.matches(&reference).count(), 1);
        }
    }

    #[test]
    fn injection_leaves_one_block(css in stylesheet(), rounds in 1..4usize) {
        let params = scan_stylesheet(&css, "a.css");
        let mut text = rewrite(&css, &params, &Overrides::new());
        for _ in 0..rounds {
            text = inject_root_block(&text, &build_root_block(&params, &Overrides::new()));
        }
        prop_assert_eq!(text.matches(BLOCK_START).count(), 1);
        prop_assert_eq!(text.matches(BLOCK_END).count(), 1);
    }

    #[test]
    fn scanner_is_total(input in "\\PC{0,200}") {
        let params = scan_stylesheet(&input, "x.css");
        prop_assert!(params.len() <= rigger_engine::MAX_CSS_PARAMS);
        let _ = rewrite(&input, &params, &Overrides::new());
    }

    #[test]
    fn token_parser_is_total(input in "[a-zA-Z:{}\\[\\],'\"/* \n0-9#.-]{0,200}", limit in 0..10usize) {
        let params = extract_tokens(&input, "t.js", limit);
        prop_assert!(params.len() <= limit);
        for param in params {
            prop_assert_eq!((param.source.start, param.source.end), (-1, -1));
        }
    }

    #[test]
    fn hash_matches_shift_formulation(input in "\\PC{0,40}") {
        let mut h: u32 = 0x811c_9dc5;
        for unit in input.encode_utf16() {
            h ^= u32::from(unit);
            h = h
                .wrapping_add(h << 1)
                .wrapping_add(h << 4)
                .wrapping_add(h << 7)
                .wrapping_add(h << 8)
                .wrapping_add(h << 24);
        }
        prop_assert_eq!(stable_hash(&input), h);
    }
}

#[test]
fn five_hundred_declarations_yield_the_cap() {
    let css: String = (0..500)
        .map(|i| format!(".item-{} {{ padding: {}px; }}\n", i, i))
        .collect();
    assert_eq!(scan_stylesheet(&css, "big.css").len(), 120);
}
