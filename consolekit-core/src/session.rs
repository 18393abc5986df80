use unicode_normalization::UnicodeNormalization;

use crate::APP_NAME;

// STS caps RoleSessionName at 64 characters from the [\w+=,.@-] set.
const MAX_SESSION_NAME_LEN: usize = 64;

const fn is_session_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '=' | ',' | '.' | '@' | '-')
}

/// Transliterates an identity to the STS session-name character set.
///
/// Decomposes to NFKD so accented characters keep their base letter, then
/// drops whitespace and anything outside the allowed set.
fn transliterate(identity: &str) -> String {
    identity
        .nfkd()
        .filter(|c| is_session_char(*c))
        .collect()
}

/// Builds the deterministic session name tagging a role-assumption call.
///
/// Composed of the application identifier, the ASCII-transliterated and
/// whitespace-stripped user identity, and the role name, so the session is
/// attributable in the identity service's audit logs. Truncated to the STS
/// 64-character limit.
#[must_use]
pub fn session_name(user: &str, role: &str) -> String {
    let mut name = format!(
        "{APP_NAME}-{}-{}",
        transliterate(user),
        transliterate(role)
    );
    name.truncate(MAX_SESSION_NAME_LEN);
    name
}
