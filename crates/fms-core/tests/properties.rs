//! Property tests for email routing resolution.

#![allow(clippy::unwrap_used)]

use fms_core::{ALLOY_SENTINEL, Config, EmailResolver, RowClassifier};
use proptest::prelude::*;

fn config() -> Config {
    Config::from_yaml_str(
        "sheet_range: A1:K99\n\
         columns: {group: 0, category: 1, emails: [2, 4, 9], wfs_layer: 10}\n",
    )
    .unwrap()
}

/// Cell text without `@`.
fn plain_cell() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ._-]{0,20}"
}

/// Cell text that may or may not hold an address.
fn any_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        plain_cell(),
        "[a-z]{1,8}@[a-z]{1,8}\\.org",
        Just(String::new()),
    ]
}

proptest! {
    #[test]
    fn alloy_in_any_email_column_excludes_row(
        cells in proptest::collection::vec(any_cell(), 11),
        alloy_at in prop::sample::select(vec![2usize, 4, 9]),
    ) {
        let mut row = cells;
        row[alloy_at] = ALLOY_SENTINEL.to_string();
        let config = config();
        let parsed = RowClassifier::new(&config).unwrap().classify(&row).unwrap();
        prop_assert_eq!(parsed.email, None);
    }

    #[test]
    fn no_at_sign_means_no_email(cells in proptest::collection::vec(plain_cell(), 0..12)) {
        let config = config();
        let parsed = RowClassifier::new(&config).unwrap().classify(&cells).unwrap();
        prop_assert_eq!(parsed.email, None);
    }

    #[test]
    fn first_address_in_column_order_wins(
        candidates in proptest::collection::vec(any_cell(), 1..6),
    ) {
        let resolution = EmailResolver::default().resolve(&candidates);
        let addresses: Vec<&String> = candidates.iter().filter(|c| c.contains('@')).collect();
        let routed_elsewhere = candidates.iter().any(|c| c == ALLOY_SENTINEL);

        match addresses.first() {
            _ if routed_elsewhere => prop_assert_eq!(resolution.email, None),
            Some(first) => {
                let expected = first.split(' ').next().unwrap_or_default();
                prop_assert_eq!(resolution.email.as_deref(), Some(expected));
                prop_assert_eq!(resolution.warnings.len(), usize::from(addresses.len() > 1));
            }
            None => prop_assert_eq!(resolution.email, None),
        }
    }

    #[test]
    fn alias_has_no_dots_or_at_signs_in_substituted_part(
        local in "[a-z]{1,8}(\\.[a-z]{1,8}){0,2}",
        domain in "[a-z]{1,8}(\\.[a-z]{1,8}){1,2}",
    ) {
        let resolver = EmailResolver::new(Some("{email}")).unwrap();
        let email = format!("{local}@{domain}");
        let alias = resolver.resolve(&[email]).email.unwrap();
        prop_assert!(!alias.contains('.'));
        prop_assert!(!alias.contains('@'));
    }
}
