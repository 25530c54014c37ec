/// Resolves `$VARIABLE` references in configured output names
#[derive(Default)]
pub struct Tpl {
    // Kept longest-key-first so `$NAME_SHORT` is never clobbered by `$NAME`.
    variables: Vec<(String, String)>,
}

impl Tpl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        self.variables.retain(|(k, _)| *k != key);
        self.variables.push((key, value.into()));
        self.variables.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Unknown variables are left in place.
    pub fn parse(&self, input: &str) -> String {
        self.variables
            .iter()
            .fold(input.to_string(), |acc, (key, value)| {
                acc.replace(&format!("${key}"), value)
            })
    }
}
