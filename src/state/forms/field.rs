//! Form field value objects

/// A selectable option: (wire value, display label)
pub type ChoiceOption = (&'static str, &'static str);

/// Type-safe field values
#[derive(Debug, Clone)]
pub enum FieldValue {
    Text(String),
    /// Index into `options`; `None` means nothing selected (wire value "").
    /// A value set from outside that matches no option is kept in `custom`.
    Choice {
        options: &'static [ChoiceOption],
        selected: Option<usize>,
        custom: Option<String>,
    },
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

/// Represents a single form field with its configuration and value
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub value: FieldValue,
    pub is_multiline: bool,
}

impl FormField {
    /// Create a new text field
    pub fn text(name: &str, label: &str, is_multiline: bool) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value: FieldValue::Text(String::new()),
            is_multiline,
        }
    }

    /// Create a new fixed-choice field with nothing selected
    pub fn choice(name: &str, label: &str, options: &'static [ChoiceOption]) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value: FieldValue::Choice {
                options,
                selected: None,
                custom: None,
            },
            is_multiline: false,
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self.value, FieldValue::Choice { .. })
    }

    /// The value sent over the wire: the typed text, the selected option's
    /// value, or a custom value verbatim ("" when unset)
    pub fn as_text(&self) -> &str {
        match &self.value {
            FieldValue::Text(s) => s,
            FieldValue::Choice {
                options,
                selected,
                custom,
            } => selected
                .and_then(|i| options.get(i))
                .map(|(value, _)| *value)
                .or(custom.as_deref())
                .unwrap_or(""),
        }
    }

    /// Set the value from its wire form.
    ///
    /// For choice fields a value outside the option list is kept as is.
    pub fn set_text(&mut self, value: String) {
        match &mut self.value {
            FieldValue::Text(s) => *s = value,
            FieldValue::Choice {
                options,
                selected,
                custom,
            } => {
                *selected = options.iter().position(|(v, _)| *v == value);
                *custom = (selected.is_none() && !value.is_empty()).then_some(value);
            }
        }
    }

    /// Push a character to the field value (ignored by choice fields)
    pub fn push_char(&mut self, c: char) {
        if let FieldValue::Text(s) = &mut self.value {
            s.push(c);
        }
    }

    /// Remove the last character from the field value
    pub fn pop_char(&mut self) {
        match &mut self.value {
            FieldValue::Text(s) => {
                s.pop();
            }
            FieldValue::Choice {
                selected, custom, ..
            } => {
                *selected = None;
                *custom = None;
            }
        }
    }

    /// Select the next option, wrapping through "unset"
    pub fn next_choice(&mut self) {
        if let FieldValue::Choice {
            options,
            selected,
            custom,
        } = &mut self.value
        {
            // A custom value sits in the "unset" slot of the cycle
            *custom = None;
            *selected = match *selected {
                None if !options.is_empty() => Some(0),
                Some(i) if i + 1 < options.len() => Some(i + 1),
                _ => None,
            };
        }
    }

    /// Select the previous option, wrapping through "unset"
    pub fn prev_choice(&mut self) {
        if let FieldValue::Choice {
            options,
            selected,
            custom,
        } = &mut self.value
        {
            *custom = None;
            *selected = match *selected {
                None => options.len().checked_sub(1),
                Some(0) => None,
                Some(i) => Some(i - 1),
            };
        }
    }

    /// Clear the field value
    pub fn clear(&mut self) {
        match &mut self.value {
            FieldValue::Text(s) => s.clear(),
            FieldValue::Choice {
                selected, custom, ..
            } => {
                *selected = None;
                *custom = None;
            }
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match &self.value {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Choice {
                options,
                selected,
                custom,
            } => match (selected.and_then(|i| options.get(i)), custom) {
                (Some((_, label)), _) => format!("◂ {label} ▸"),
                (None, Some(custom)) => format!("◂ {custom} ▸"),
                (None, None) => "◂ Select ▸".to_string(),
            },
        }
    }
}
