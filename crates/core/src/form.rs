/// Booleans travel through multipart forms as `"true"` / `"false"`.
pub(crate) fn form_bool(value: bool) -> String {
    value.to_string()
}
