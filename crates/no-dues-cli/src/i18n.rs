// crates/no-dues-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings for localization support.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The No Dues CLI stores user-facing strings in a small translation catalog
//! so office staff can read output in English or Hindi. All runtime output
//! should be routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.
//! - Placeholder substitutions preserve deterministic order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
///
/// # Invariants
/// - Variants are stable for CLI parsing and catalog lookup.
/// - [`Locale::En`] is the default fallback locale.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Hindi.
    Hi,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
        }
    }

    /// Attempts to parse a locale value (case-insensitive, tolerant of region tags).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let normalized = value.to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or("");
        match lang {
            "en" => Some(Self::En),
            "hi" => Some(Self::Hi),
            _ => None,
        }
    }
}

/// Ordered list of supported CLI locales.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Hi];

/// A formatted message argument captured by the [`macro@crate::t`] macro.
///
/// # Invariants
/// - `key` matches a placeholder name without braces (for example, `path`).
/// - `value` is preformatted and should be safe for display.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Global locale selection for CLI output.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static English catalog entries loaded into the localized message bundle.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "no-dues {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("output.json_failed", "Failed to serialize output: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config validated successfully."),
    ("roster.load_failed", "Failed to load roster: {error}"),
    ("roster.seed_failed", "Failed to seed roster data: {error}"),
    ("store.open_failed", "Failed to open certificate store: {error}"),
    ("audit.open_failed", "Failed to open audit log at {path}: {error}"),
    ("time.system_failed", "Failed to read system time: {error}"),
    ("time.overflow", "System time exceeds the supported range."),
    ("time.negative", "Timestamp override must be non-negative."),
    ("actor.roles_missing", "At least one --role is required."),
    ("certificate.id_invalid", "Certificate id must be a positive integer: {value}"),
    ("certificate.failed", "Operation failed ({kind}): {error}"),
    ("certificate.deleted", "Certificate {id} deleted."),
    ("certificate.view.header", "Certificate {number} (id {id})"),
    ("certificate.view.student", "Student: {name} ({roll_number}), {branch}, semester {semester}"),
    ("certificate.view.status", "Status: {status}"),
    ("certificate.view.created", "Requested at: {created_at}"),
    ("certificate.view.issued", "Issued on: {issue_date}"),
    ("certificate.view.principal_signed", "Principal: signed by {name} at {signed_at}"),
    ("certificate.view.principal_pending", "Principal: not signed"),
    ("certificate.view.signature_pending", "- {department} [{code}]: {status}"),
    (
        "certificate.view.signature_resolved",
        "- {department} [{code}]: {status} by {signer} at {signed_at}",
    ),
    ("certificate.view.comments", "  Comments: {comments}"),
    ("certificate.list.header", "Certificates:"),
    ("certificate.list.none", "No certificates found."),
    (
        "certificate.list.entry",
        "- {id} {number} {name} ({roll_number}) {status} {signed}/{required}",
    ),
    (
        "eligibility.eligible",
        "Student {roll_number} has no outstanding dues and may request a certificate.",
    ),
    ("eligibility.blocked", "Student {roll_number} has {count} outstanding due(s):"),
    ("eligibility.due", "- {due_id} {department}: {description} ({amount}, {status})"),
    (
        "signature_request.sent",
        "Signature request for {department} on certificate {number} recorded by {requested_by}.",
    ),
    (
        "signature_request.notify",
        "Notification: {department_name} is asked to sign certificate {number}.",
    ),
    ("departments.list.header", "Required departments:"),
    ("departments.list.entry", "- {code}: {name}"),
    ("departments.list.none", "No departments configured."),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'hi'."),
    (
        "i18n.disclaimer.machine_translated",
        "Note: non-English output is machine-translated and may be inaccurate.",
    ),
];

/// Static Hindi catalog entries loaded into the localized message bundle.
const CATALOG_HI: &[(&str, &str)] = &[
    ("main.version", "no-dues {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "आउटपुट"),
    ("output.write_failed", "{stream} पर लिखना विफल रहा: {error}"),
    ("output.json_failed", "आउटपुट को क्रमबद्ध करना विफल रहा: {error}"),
    ("config.load_failed", "कॉन्फ़िग लोड करना विफल रहा: {error}"),
    ("config.validate.ok", "कॉन्फ़िग सफलतापूर्वक सत्यापित हुआ।"),
    ("roster.load_failed", "रोस्टर लोड करना विफल रहा: {error}"),
    ("roster.seed_failed", "रोस्टर डेटा भरना विफल रहा: {error}"),
    ("store.open_failed", "प्रमाणपत्र स्टोर खोलना विफल रहा: {error}"),
    ("audit.open_failed", "{path} पर ऑडिट लॉग खोलना विफल रहा: {error}"),
    ("time.system_failed", "सिस्टम समय पढ़ना विफल रहा: {error}"),
    ("time.overflow", "सिस्टम समय समर्थित सीमा से बाहर है।"),
    ("time.negative", "टाइमस्टैम्प ओवरराइड ऋणात्मक नहीं हो सकता।"),
    ("actor.roles_missing", "कम से कम एक --role आवश्यक है।"),
    ("certificate.id_invalid", "प्रमाणपत्र आईडी धनात्मक पूर्णांक होनी चाहिए: {value}"),
    ("certificate.failed", "कार्य विफल रहा ({kind}): {error}"),
    ("certificate.deleted", "प्रमाणपत्र {id} हटाया गया।"),
    ("certificate.view.header", "प्रमाणपत्र {number} (आईडी {id})"),
    (
        "certificate.view.student",
        "छात्र: {name} ({roll_number}), {branch}, सेमेस्टर {semester}",
    ),
    ("certificate.view.status", "स्थिति: {status}"),
    ("certificate.view.created", "अनुरोध समय: {created_at}"),
    ("certificate.view.issued", "जारी करने की तिथि: {issue_date}"),
    ("certificate.view.principal_signed", "प्राचार्य: {name} द्वारा {signed_at} पर हस्ताक्षरित"),
    ("certificate.view.principal_pending", "प्राचार्य: हस्ताक्षर नहीं हुए"),
    ("certificate.view.signature_pending", "- {department} [{code}]: {status}"),
    (
        "certificate.view.signature_resolved",
        "- {department} [{code}]: {status}, {signer} द्वारा {signed_at} पर",
    ),
    ("certificate.view.comments", "  टिप्पणी: {comments}"),
    ("certificate.list.header", "प्रमाणपत्र:"),
    ("certificate.list.none", "कोई प्रमाणपत्र नहीं मिला।"),
    (
        "certificate.list.entry",
        "- {id} {number} {name} ({roll_number}) {status} {signed}/{required}",
    ),
    (
        "eligibility.eligible",
        "छात्र {roll_number} का कोई बकाया नहीं है और वह प्रमाणपत्र का अनुरोध कर सकता है।",
    ),
    ("eligibility.blocked", "छात्र {roll_number} के {count} बकाया शेष हैं:"),
    ("eligibility.due", "- {due_id} {department}: {description} ({amount}, {status})"),
    (
        "signature_request.sent",
        "प्रमाणपत्र {number} पर {department} के हस्ताक्षर का अनुरोध {requested_by} द्वारा दर्ज \
         किया गया।",
    ),
    (
        "signature_request.notify",
        "सूचना: {department_name} से प्रमाणपत्र {number} पर हस्ताक्षर का अनुरोध किया गया है।",
    ),
    ("departments.list.header", "आवश्यक विभाग:"),
    ("departments.list.entry", "- {code}: {name}"),
    ("departments.list.none", "कोई विभाग कॉन्फ़िगर नहीं है।"),
    ("i18n.lang.invalid_env", "{env} के लिए अमान्य मान: {value}. 'en' या 'hi' अपेक्षित है।"),
    (
        "i18n.disclaimer.machine_translated",
        "नोट: गैर-अंग्रेज़ी आउटपुट मशीन द्वारा अनूदित है और अशुद्ध हो सकता है।",
    ),
];

/// Returns the raw catalog entries for the requested locale.
#[cfg(test)]
pub(crate) const fn catalog_entries_for(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::En => CATALOG_EN,
        Locale::Hi => CATALOG_HI,
    }
}

/// Returns the message catalog for the requested locale.
pub(crate) fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_HI_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match locale {
        Locale::En => CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect()),
        Locale::Hi => CATALOG_HI_MAP.get_or_init(|| CATALOG_HI.iter().copied().collect()),
    }
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the selected locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let locale = current_locale();
    let template = catalog_for(locale)
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
///
/// # Returns
///
/// A localized [`String`] with placeholders substituted.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
