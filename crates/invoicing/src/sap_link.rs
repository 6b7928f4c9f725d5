//! SAP deep-link builder.
//!
//! The link template lives in externally persisted settings; this module
//! only performs the substitution.

/// Literal placeholder substituted verbatim inside an already-formed URL.
pub const REF_PLACEHOLDER: &str = "{ref}";

/// Namespaced settings key holding the link template.
pub const SAP_LINK_TEMPLATE_KEY: &str = "sap.invoice_link_template";

/// Build a deep link into the accounting system for `reference`.
///
/// - No template configured (absent or empty) → `None`, no link.
/// - Template contains `{ref}` → the reference is substituted verbatim
///   (not URL-encoded; the template is an already-formed URL).
/// - Otherwise a `ref=<urlencoded reference>` query parameter is appended,
///   with `?` when the template has no query string yet, `&` when it does.
pub fn build_deep_link(reference: &str, template: Option<&str>) -> Option<String> {
    let template = template?.trim();
    if template.is_empty() {
        return None;
    }

    if template.contains(REF_PLACEHOLDER) {
        return Some(template.replace(REF_PLACEHOLDER, reference));
    }

    let separator = if template.contains('?') { '&' } else { '?' };
    Some(format!(
        "{template}{separator}ref={}",
        urlencoding::encode(reference)
    ))
}
