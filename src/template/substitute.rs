// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! `${NAME}` placeholder substitution

use crate::types::Variables;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Z_]+)\}").expect("placeholder pattern is valid"));

/// Replace every `${UPPER_NAME}` whose name is in `variables`.
///
/// Unknown names are left verbatim; values are inserted unescaped.
pub fn substitute(text: &str, variables: &Variables) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| match variables.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
