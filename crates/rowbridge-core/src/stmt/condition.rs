/// A raw predicate, ordering or set-membership fragment.
///
/// Conditions are spliced into statement text verbatim, so they are never
/// bound as parameters. Construction bounds their length and rejects
/// statement separators, comment openers and control characters.
///
/// ```
/// use rowbridge_core::stmt::Condition;
///
/// let older = Condition::new(">20").unwrap();
/// let by_name = Condition::new("ORDER BY [Name] ASC").unwrap();
/// assert!(by_name.is_order_by());
/// assert!(!older.is_order_by());
/// assert!(Condition::new("= 1; DROP TABLE Quiz").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    text: String,
}

impl Condition {
    /// Default upper bound on fragment length, in bytes.
    pub const MAX_LEN: usize = 1024;

    pub fn new(text: impl Into<String>) -> crate::Result<Self> {
        Self::with_max_len(text, Self::MAX_LEN)
    }

    pub fn with_max_len(text: impl Into<String>, max_len: usize) -> crate::Result<Self> {
        let text = text.into();
        check_len(&text, max_len)?;

        for token in [";", "--", "/*", "*/"] {
            if text.contains(token) {
                return Err(crate::Error::invalid_condition(format!(
                    "fragment contains `{token}`"
                )));
            }
        }

        if text.chars().any(|c| c.is_control() && c != '\t') {
            return Err(crate::Error::invalid_condition(
                "fragment contains control characters",
            ));
        }

        Ok(Self { text })
    }

    /// `IN (...)` over literal values, escaping text items.
    pub fn is_in<I, V>(values: I) -> crate::Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<super::Value>,
    {
        Self::is_in_with_max_len(values, Self::MAX_LEN)
    }

    /// Like [`is_in`](Condition::is_in) with an explicit length bound.
    ///
    /// The items are escaped literals, so separators or comment markers
    /// inside text values are kept as data.
    pub fn is_in_with_max_len<I, V>(values: I, max_len: usize) -> crate::Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<super::Value>,
    {
        let items = values
            .into_iter()
            .map(|value| match value.into() {
                super::Value::String(s) => Ok(format!("'{}'", s.replace('\'', "''"))),
                super::Value::Bool(b) => Ok(if b { "1" } else { "0" }.to_string()),
                super::Value::I64(v) => Ok(v.to_string()),
                super::Value::F64(v) => Ok(v.to_string()),
                other => Err(crate::Error::invalid_condition(format!(
                    "cannot use {} in an IN list",
                    other.kind_name()
                ))),
            })
            .collect::<crate::Result<Vec<_>>>()?;

        let text = format!("IN ({})", items.join(","));
        check_len(&text, max_len)?;

        Ok(Self { text })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// True when the fragment carries an `ORDER BY` directive.
    pub fn is_order_by(&self) -> bool {
        self.text.to_ascii_lowercase().contains("order by")
    }
}

fn check_len(text: &str, max_len: usize) -> crate::Result<()> {
    if text.trim().is_empty() {
        return Err(crate::Error::invalid_condition("fragment is empty"));
    }

    if text.len() > max_len {
        return Err(crate::Error::invalid_condition(format!(
            "fragment is {} bytes, limit is {max_len}",
            text.len()
        )));
    }

    Ok(())
}

impl core::fmt::Display for Condition {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(&self.text)
    }
}
