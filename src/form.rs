/// Every field the price form tracks, in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Brand,
    Model,
    Yom,
    EngineCc,
    Gear,
    FuelType,
    Mileage,
    Town,
    Date,
    Condition,
    Leasing,
    AirCondition,
    PowerSteering,
    PowerMirror,
    PowerWindow,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Filled through the modal picker from a catalog list.
    Picker {
        catalog_key: &'static str,
        title: &'static str,
    },
    Number,
    Choice(&'static [&'static str]),
    Date,
    Checkbox,
}

const GEAR_OPTIONS: &[&str] = &["Automatic", "Manual", "Tiptronic"];
const FUEL_OPTIONS: &[&str] = &["Petrol", "Diesel", "Hybrid", "Electric"];
const CONDITION_OPTIONS: &[&str] = &["New", "Used", "Reconditioned"];

impl FormField {
    pub const ALL: &'static [FormField] = &[
        FormField::Brand,
        FormField::Model,
        FormField::Yom,
        FormField::EngineCc,
        FormField::Gear,
        FormField::FuelType,
        FormField::Mileage,
        FormField::Town,
        FormField::Date,
        FormField::Condition,
        FormField::Leasing,
        FormField::AirCondition,
        FormField::PowerSteering,
        FormField::PowerMirror,
        FormField::PowerWindow,
    ];

    /// Query parameter name sent to the price endpoint.
    pub fn name(&self) -> &'static str {
        match self {
            FormField::Brand => "brand",
            FormField::Model => "model",
            FormField::Yom => "yom",
            FormField::EngineCc => "engineCC",
            FormField::Gear => "gear",
            FormField::FuelType => "fuelType",
            FormField::Mileage => "mileage",
            FormField::Town => "town",
            FormField::Date => "date",
            FormField::Condition => "condition",
            FormField::Leasing => "leasing",
            FormField::AirCondition => "airCondition",
            FormField::PowerSteering => "powerSteering",
            FormField::PowerMirror => "powerMirror",
            FormField::PowerWindow => "powerWindow",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Brand => "Brand",
            FormField::Model => "Model",
            FormField::Yom => "Year of Manufacture",
            FormField::EngineCc => "Engine (cc)",
            FormField::Gear => "Gear",
            FormField::FuelType => "Fuel Type",
            FormField::Mileage => "Mileage (km)",
            FormField::Town => "Town",
            FormField::Date => "Date",
            FormField::Condition => "Condition",
            FormField::Leasing => "Leasing",
            FormField::AirCondition => "Air Condition",
            FormField::PowerSteering => "Power Steering",
            FormField::PowerMirror => "Power Mirror",
            FormField::PowerWindow => "Power Window",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FormField::Brand => FieldKind::Picker {
                catalog_key: "brand",
                title: "Select Brand",
            },
            FormField::Model => FieldKind::Picker {
                catalog_key: "model",
                title: "Select Model",
            },
            FormField::Town => FieldKind::Picker {
                catalog_key: "town",
                title: "Select Town",
            },
            FormField::Yom | FormField::EngineCc | FormField::Mileage => FieldKind::Number,
            FormField::Gear => FieldKind::Choice(GEAR_OPTIONS),
            FormField::FuelType => FieldKind::Choice(FUEL_OPTIONS),
            FormField::Condition => FieldKind::Choice(CONDITION_OPTIONS),
            FormField::Date => FieldKind::Date,
            FormField::Leasing
            | FormField::AirCondition
            | FormField::PowerSteering
            | FormField::PowerMirror
            | FormField::PowerWindow => FieldKind::Checkbox,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
enum FieldValue {
    Text(String),
    Flag(bool),
}

/// Current input for every tracked field. Plays the part of the page:
/// the picker writes into it and the controller reads from it.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    values: Vec<FieldValue>,
}

impl Default for FormState {
    fn default() -> Self {
        let values = FormField::ALL
            .iter()
            .map(|field| match field.kind() {
                FieldKind::Checkbox => FieldValue::Flag(false),
                _ => FieldValue::Text(String::new()),
            })
            .collect();
        Self { values }
    }
}

impl FormState {
    pub fn new(today: &str) -> Self {
        let mut form = Self::default();
        form.set_text(FormField::Date, today);
        form
    }

    pub fn text(&self, field: FormField) -> &str {
        match &self.values[field.index()] {
            FieldValue::Text(s) => s,
            FieldValue::Flag(_) => "",
        }
    }

    pub fn is_checked(&self, field: FormField) -> bool {
        matches!(self.values[field.index()], FieldValue::Flag(true))
    }

    /// Checkbox fields ignore text writes.
    pub fn set_text(&mut self, field: FormField, value: &str) {
        if let FieldValue::Text(s) = &mut self.values[field.index()] {
            *s = value.to_string();
        }
    }

    pub fn push_char(&mut self, field: FormField, c: char) {
        if let FieldValue::Text(s) = &mut self.values[field.index()] {
            s.push(c);
        }
    }

    pub fn pop_char(&mut self, field: FormField) {
        if let FieldValue::Text(s) = &mut self.values[field.index()] {
            s.pop();
        }
    }

    pub fn toggle(&mut self, field: FormField) {
        if let FieldValue::Flag(b) = &mut self.values[field.index()] {
            *b = !*b;
        }
    }

    /// Steps a choice field through its options. The empty value sits
    /// between the last and the first option.
    pub fn cycle_choice(&mut self, field: FormField, forward: bool) {
        let FieldKind::Choice(options) = field.kind() else {
            return;
        };
        let current = options.iter().position(|o| *o == self.text(field));
        let next = match (current, forward) {
            (None, true) => Some(0),
            (None, false) => Some(options.len() - 1),
            (Some(i), true) if i + 1 < options.len() => Some(i + 1),
            (Some(i), false) if i > 0 => Some(i - 1),
            (Some(_), _) => None,
        };
        let value = next.map(|i| options[i]).unwrap_or_default();
        self.set_text(field, value);
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormField::ALL
            .iter()
            .map(|field| {
                let value = match field.kind() {
                    FieldKind::Checkbox => SnapshotValue::Flag(self.is_checked(*field)),
                    FieldKind::Number => SnapshotValue::Number(parse_number(self.text(*field))),
                    _ => SnapshotValue::Text(self.text(*field).to_string()),
                };
                (field.name(), value)
            })
            .collect()
    }
}

fn parse_number(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotValue {
    Text(String),
    Number(Option<i64>),
    Flag(bool),
}

impl SnapshotValue {
    /// `None` for absent numbers and empty strings; those are left out of the query.
    pub fn to_param(&self) -> Option<String> {
        match self {
            SnapshotValue::Text(s) if s.is_empty() => None,
            SnapshotValue::Text(s) => Some(s.clone()),
            SnapshotValue::Number(n) => n.map(|n| n.to_string()),
            SnapshotValue::Flag(b) => Some(b.to_string()),
        }
    }
}

/// One-shot typed capture of the form at submission time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSnapshot {
    entries: Vec<(&'static str, SnapshotValue)>,
}

impl FormSnapshot {
    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&SnapshotValue> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.entries
            .iter()
            .filter_map(|(key, value)| value.to_param().map(|v| (*key, v)))
            .collect()
    }
}

impl FromIterator<(&'static str, SnapshotValue)> for FormSnapshot {
    fn from_iter<I: IntoIterator<Item = (&'static str, SnapshotValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_table_matches_wire_names() {
        let names: Vec<&str> = FormField::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            vec![
                "brand",
                "model",
                "yom",
                "engineCC",
                "gear",
                "fuelType",
                "mileage",
                "town",
                "date",
                "condition",
                "leasing",
                "airCondition",
                "powerSteering",
                "powerMirror",
                "powerWindow",
            ]
        );
    }

    #[test]
    fn new_form_defaults_date() {
        let form = FormState::new("2026-10-17");
        assert_eq!(form.text(FormField::Date), "2026-10-17");
        assert_eq!(form.text(FormField::Brand), "");
        assert!(!form.is_checked(FormField::Leasing));
    }

    #[test]
    fn numbers_parse_or_become_absent() {
        let mut form = FormState::default();
        form.set_text(FormField::Yom, " 2020 ");
        form.set_text(FormField::EngineCc, "1.5L");
        let snapshot = form.snapshot();
        assert_eq!(snapshot.get("yom"), Some(&SnapshotValue::Number(Some(2020))));
        assert_eq!(snapshot.get("engineCC"), Some(&SnapshotValue::Number(None)));
        assert_eq!(snapshot.get("mileage"), Some(&SnapshotValue::Number(None)));
    }

    #[test]
    fn snapshot_records_text_and_flags() {
        let mut form = FormState::default();
        form.set_text(FormField::Town, "Kandy");
        form.toggle(FormField::PowerSteering);
        let snapshot = form.snapshot();
        assert_eq!(snapshot.get("town"), Some(&SnapshotValue::Text("Kandy".into())));
        assert_eq!(snapshot.get("model"), Some(&SnapshotValue::Text(String::new())));
        assert_eq!(snapshot.get("powerSteering"), Some(&SnapshotValue::Flag(true)));
        assert_eq!(snapshot.get("leasing"), Some(&SnapshotValue::Flag(false)));
    }

    #[test]
    fn query_omits_absent_and_empty_values() {
        let snapshot: FormSnapshot = [
            ("yom", SnapshotValue::Number(parse_number("2020"))),
            ("mileage", SnapshotValue::Number(parse_number(""))),
            ("town", SnapshotValue::Text("Colombo".into())),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            snapshot.query_pairs(),
            vec![("yom", "2020".to_string()), ("town", "Colombo".to_string())]
        );
    }

    #[test]
    fn query_keeps_false_checkboxes() {
        let pairs = FormState::default().snapshot().query_pairs();
        assert_eq!(pairs.len(), 5);
        assert!(pairs.iter().all(|(_, v)| v == "false"));
    }

    #[test]
    fn choice_cycles_through_empty() {
        let mut form = FormState::default();
        form.cycle_choice(FormField::Gear, true);
        assert_eq!(form.text(FormField::Gear), "Automatic");
        form.cycle_choice(FormField::Gear, false);
        assert_eq!(form.text(FormField::Gear), "");
        form.cycle_choice(FormField::Gear, false);
        assert_eq!(form.text(FormField::Gear), "Tiptronic");
        form.cycle_choice(FormField::Gear, true);
        assert_eq!(form.text(FormField::Gear), "");
    }

    #[test]
    fn checkbox_ignores_text_edits() {
        let mut form = FormState::default();
        form.push_char(FormField::Leasing, 'x');
        form.set_text(FormField::Leasing, "yes");
        assert!(!form.is_checked(FormField::Leasing));
        form.toggle(FormField::Brand);
        assert_eq!(form.text(FormField::Brand), "");
    }
}
