//! Per-variable layout derivation.
//!
//! [`CompiledVariable::compile`] runs once per variable and fixes every
//! derived fact the statement emitters need: the syntax name or name range,
//! component names of multiple-response sets, the read-statement field
//! entry, and the missing-value sentinel.

use tracing::{debug, warn};

use sss_model::{MultipleKind, RecordFormat, Variable, VariableType};

use crate::error::{Result, SyntaxError};
use crate::options::SyntaxOptions;
use crate::quote::smart_quote;

/// Host keyword for the numeric system-missing value.
pub const SYSTEM_MISSING: &str = "$SYSMIS";

/// Field entry of a variable in the read statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSpec {
    /// Column-range entry of a fixed-format read.
    Fixed(String),
    /// Delimited entry, placed by field order rather than document order.
    Delimited { order: usize, spec: String },
}

impl FieldSpec {
    pub fn spec(&self) -> &str {
        match self {
            FieldSpec::Fixed(spec) => spec,
            FieldSpec::Delimited { spec, .. } => spec,
        }
    }
}

/// A variable together with its derived layout.
#[derive(Debug, Clone)]
pub struct CompiledVariable<'a> {
    pub variable: &'a Variable,
    pub name: String,
    /// `name`, or `name_1 TO name_n` for multiple-response sets.
    pub vardef: String,
    /// Component names of a multiple-response set; empty otherwise.
    pub members: Vec<String>,
    pub multiple: Option<MultipleKind>,
    /// Base format token (`F`, `A`, `A8`, `A6`).
    pub format: &'static str,
    pub field: FieldSpec,
    /// Width of each component of a multiple-response set.
    pub subfield_width: usize,
    /// Dichotomy components that have a value label, in component order.
    pub dichotomy_members: Vec<String>,
    /// Sentinel assigned to filtered-out cases, already quoted if literal.
    pub missing_code: String,
}

impl<'a> CompiledVariable<'a> {
    pub fn compile(
        variable: &'a Variable,
        record_format: RecordFormat,
        options: &SyntaxOptions,
    ) -> Result<Self> {
        let name = variable
            .name
            .clone()
            .ok_or_else(|| SyntaxError::layout(variable.display_name(), "variable has no name"))?;
        let var_type = variable
            .var_type
            .ok_or_else(|| SyntaxError::layout(&name, "missing or unsupported type"))?;
        let start = variable
            .position
            .start
            .ok_or_else(|| SyntaxError::layout(&name, "position has no start"))?;
        let format = base_format(var_type, variable.format.is_literal(), record_format);

        let multiple = variable.multiple_kind();
        let subfield_width = variable.spread.width.unwrap_or(1);
        let mut members = Vec::new();
        let mut dichotomy_members = Vec::new();

        let (vardef, field) = match multiple {
            None => {
                let field = match record_format {
                    RecordFormat::Fixed => {
                        let finish = variable.position.finish.unwrap_or(start);
                        if finish < start {
                            return Err(SyntaxError::layout(
                                &name,
                                format!("finish column {finish} precedes start column {start}"),
                            ));
                        }
                        FieldSpec::Fixed(format!("{name} {start}-{finish} ({format})"))
                    }
                    RecordFormat::Csv => FieldSpec::Delimited {
                        order: start,
                        spec: format!("{name} {format}"),
                    },
                };
                (name.clone(), field)
            }
            Some(kind) => {
                if subfield_width == 0 {
                    return Err(SyntaxError::layout(&name, "spread width is zero"));
                }
                let count = match kind {
                    MultipleKind::Category => variable.spread.subfields.unwrap_or_default(),
                    MultipleKind::Dichotomy => {
                        let end = dichotomy_end(variable, &name, start)?;
                        (end + 1).saturating_sub(start) / subfield_width
                    }
                };
                if count == 0 {
                    return Err(SyntaxError::layout(&name, "set has no component variables"));
                }
                members = (1..=count).map(|i| format!("{name}_{i}")).collect();
                if kind == MultipleKind::Dichotomy {
                    dichotomy_members = (1..=count)
                        .filter(|i| variable.values.contains_key(&i.to_string()))
                        .map(|i| format!("{name}_{i}"))
                        .collect();
                }
                let vardef = format!("{name}_1 TO {name}_{count}");
                let field = match record_format {
                    RecordFormat::Fixed => {
                        FieldSpec::Fixed(format!("{vardef} ({count}F{subfield_width})"))
                    }
                    // The whole set is read as one string and split up afterwards.
                    RecordFormat::Csv => FieldSpec::Delimited {
                        order: start,
                        spec: format!("{name} A"),
                    },
                };
                (vardef, field)
            }
        };

        let missing_code = missing_code(variable, &name, &options.string_missing_code);
        debug!(
            variable = %name,
            vardef = %vardef,
            multiple = ?multiple,
            components = members.len(),
            "compiled variable"
        );

        Ok(Self {
            variable,
            name,
            vardef,
            members,
            multiple,
            format,
            field,
            subfield_width,
            dichotomy_members,
            missing_code,
        })
    }

    pub fn is_literal(&self) -> bool {
        self.variable.format.is_literal()
    }

    pub fn is_dichotomy(&self) -> bool {
        self.multiple == Some(MultipleKind::Dichotomy)
    }

    /// Names the variable's statements address: the components of a set, or
    /// the variable itself.
    pub fn targets(&self) -> Vec<&str> {
        if self.members.is_empty() {
            vec![self.name.as_str()]
        } else {
            self.members.iter().map(String::as_str).collect()
        }
    }
}

/// Base read format for a variable type.
pub fn base_format(var_type: VariableType, literal: bool, record_format: RecordFormat) -> &'static str {
    let csv = record_format == RecordFormat::Csv;
    match var_type {
        VariableType::Date if csv => "A8",
        VariableType::Time if csv => "A6",
        _ if literal => "A",
        VariableType::Character | VariableType::Date | VariableType::Time => "A",
        VariableType::Single
        | VariableType::Multiple
        | VariableType::Quantity
        | VariableType::Logical => "F",
    }
}

/// Last column of a dichotomy bitstring: the explicit finish column, or the
/// column of the largest numeric code.
fn dichotomy_end(variable: &Variable, name: &str, start: usize) -> Result<usize> {
    if let Some(finish) = variable.position.finish {
        return Ok(finish);
    }
    let largest = variable
        .values
        .keys()
        .filter_map(|code| code.trim().parse::<usize>().ok())
        .max()
        .ok_or_else(|| {
            SyntaxError::layout(name, "dichotomy set has neither a finish column nor numeric codes")
        })?;
    Ok((largest + start).saturating_sub(1))
}

/// Sentinel code for cases the filter marks as missing.
///
/// It is derived from the declared codes so that it cannot collide with one:
/// ten times the largest numeric code plus one, a hundred times the range
/// upper bound plus one, or for literal codes the largest code with its last
/// character bumped to the next code point.
pub fn missing_code(variable: &Variable, name: &str, string_missing_code: &str) -> String {
    let literal = variable.format.is_literal();
    if variable.values.is_empty() {
        return if literal {
            smart_quote(string_missing_code)
        } else {
            SYSTEM_MISSING.to_string()
        };
    }

    if let Some(to) = variable.range.to.as_deref() {
        match to.trim().parse::<f64>() {
            Ok(upper) => return format_number(upper * 100.0 + 1.0),
            Err(_) => warn!(variable = %name, to = %to, "ignoring non-numeric range bound"),
        }
    }

    if literal {
        let successor = variable.values.keys().next_back().and_then(|largest| successor(largest));
        return smart_quote(successor.as_deref().unwrap_or(string_missing_code));
    }

    let largest = variable
        .values
        .keys()
        .filter_map(|code| code.trim().parse::<f64>().ok())
        .reduce(f64::max);
    match largest {
        Some(largest) => format_number(largest * 10.0 + 1.0),
        None => {
            warn!(variable = %name, "numeric variable has no numeric codes; using system missing");
            SYSTEM_MISSING.to_string()
        }
    }
}

/// `code` with its last character replaced by the next code point.
fn successor(code: &str) -> Option<String> {
    let mut chars: Vec<char> = code.chars().collect();
    let last = chars.pop()?;
    let next = char::from_u32(u32::from(last) + 1)?;
    chars.push(next);
    Some(chars.into_iter().collect())
}

/// Render without a fractional part when the value is integral.
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sss_model::VariableFormat;

    fn options() -> SyntaxOptions {
        SyntaxOptions::new("survey.xml")
    }

    fn variable(name: &str, var_type: VariableType, start: usize) -> Variable {
        let mut variable = Variable::new(Some(name.to_string()), Some(var_type));
        variable.name = Some(name.to_string());
        variable.position.start = Some(start);
        variable
    }

    #[test]
    fn dichotomy_count_from_largest_code() {
        let mut set = variable("Q5", VariableType::Multiple, 10);
        for code in ["1", "2", "3"] {
            set.insert_value(code, format!("Brand {code}"), None);
        }
        let compiled = CompiledVariable::compile(&set, RecordFormat::Fixed, &options())
            .expect("compile dichotomy");
        assert_eq!(compiled.multiple, Some(MultipleKind::Dichotomy));
        assert_eq!(compiled.members, vec!["Q5_1", "Q5_2", "Q5_3"]);
        assert_eq!(compiled.vardef, "Q5_1 TO Q5_3");
        assert_eq!(compiled.field, FieldSpec::Fixed("Q5_1 TO Q5_3 (3F1)".to_string()));
        assert_eq!(compiled.dichotomy_members.len(), 3);
    }

    #[test]
    fn dichotomy_count_from_finish_and_width() {
        let mut set = variable("Q6", VariableType::Multiple, 1);
        set.position.finish = Some(8);
        set.spread.width = Some(2);
        set.insert_value("2", "Second".to_string(), None);
        let compiled = CompiledVariable::compile(&set, RecordFormat::Fixed, &options())
            .expect("compile dichotomy");
        assert_eq!(compiled.members.len(), 4);
        assert_eq!(compiled.dichotomy_members, vec!["Q6_2"]);
        assert_eq!(compiled.field.spec(), "Q6_1 TO Q6_4 (4F2)");
    }

    #[test]
    fn category_set_reads_as_one_string_in_csv() {
        let mut set = variable("Q2", VariableType::Multiple, 4);
        set.spread.subfields = Some(3);
        set.spread.width = Some(2);
        let compiled =
            CompiledVariable::compile(&set, RecordFormat::Csv, &options()).expect("compile set");
        assert_eq!(compiled.multiple, Some(MultipleKind::Category));
        assert_eq!(
            compiled.field,
            FieldSpec::Delimited {
                order: 4,
                spec: "Q2 A".to_string()
            }
        );
        assert_eq!(compiled.subfield_width, 2);
        assert!(compiled.dichotomy_members.is_empty());
    }

    #[test]
    fn fixed_entry_defaults_to_one_column() {
        let single = variable("Q1", VariableType::Single, 7);
        let compiled =
            CompiledVariable::compile(&single, RecordFormat::Fixed, &options()).expect("compile");
        assert_eq!(compiled.field.spec(), "Q1 7-7 (F)");
        assert_eq!(compiled.targets(), vec!["Q1"]);
    }

    #[test]
    fn date_and_time_formats_depend_on_record_format() {
        assert_eq!(base_format(VariableType::Date, false, RecordFormat::Csv), "A8");
        assert_eq!(base_format(VariableType::Time, true, RecordFormat::Csv), "A6");
        assert_eq!(base_format(VariableType::Date, false, RecordFormat::Fixed), "A");
        assert_eq!(base_format(VariableType::Single, true, RecordFormat::Fixed), "A");
        assert_eq!(base_format(VariableType::Logical, false, RecordFormat::Csv), "F");
    }

    #[test]
    fn layout_errors_name_the_variable() {
        let mut unpositioned = variable("Q9", VariableType::Single, 1);
        unpositioned.position.start = None;
        let err = CompiledVariable::compile(&unpositioned, RecordFormat::Fixed, &options())
            .expect_err("no start");
        assert!(matches!(err, SyntaxError::Layout { ref variable, .. } if variable == "Q9"));

        let bitstring = variable("Q10", VariableType::Multiple, 1);
        assert!(CompiledVariable::compile(&bitstring, RecordFormat::Fixed, &options()).is_err());
    }

    #[test]
    fn numeric_sentinel_is_ten_times_largest_plus_one() {
        let mut single = variable("Q1", VariableType::Single, 1);
        for code in ["1", "2", "5"] {
            single.insert_value(code, code.to_string(), None);
        }
        assert_eq!(missing_code(&single, "Q1", ""), "51");
    }

    #[test]
    fn numeric_sentinel_compares_numerically() {
        let mut single = variable("Q1", VariableType::Single, 1);
        for code in ["9", "10"] {
            single.insert_value(code, code.to_string(), None);
        }
        assert_eq!(missing_code(&single, "Q1", ""), "101");
    }

    #[test]
    fn literal_sentinel_bumps_last_character() {
        let mut literal = variable("Q4", VariableType::Character, 1);
        literal.format = VariableFormat::Literal;
        for code in ["A", "B", "Z"] {
            literal.insert_value(code, code.to_string(), None);
        }
        assert_eq!(missing_code(&literal, "Q4", ""), "\"[\"");
    }

    #[test]
    fn range_bound_sentinel() {
        let mut quantity = variable("Q3", VariableType::Quantity, 1);
        quantity.insert_value("0", "None".to_string(), None);
        quantity.range.to = Some("99".to_string());
        assert_eq!(missing_code(&quantity, "Q3", ""), "9901");
        quantity.range.to = Some("2.5".to_string());
        assert_eq!(missing_code(&quantity, "Q3", ""), "251");
    }

    #[test]
    fn sentinel_without_codes() {
        let numeric = variable("Q1", VariableType::Quantity, 1);
        assert_eq!(missing_code(&numeric, "Q1", "x"), SYSTEM_MISSING);
        let mut literal = variable("Q2", VariableType::Character, 1);
        literal.format = VariableFormat::Literal;
        assert_eq!(missing_code(&literal, "Q2", ""), "\"\"");
        assert_eq!(missing_code(&literal, "Q2", "NA"), "\"NA\"");
    }

    #[test]
    fn numbers_drop_integral_fraction() {
        assert_eq!(format_number(51.0), "51");
        assert_eq!(format_number(-9.0), "-9");
        assert_eq!(format_number(2.5), "2.5");
    }

    proptest! {
        #[test]
        fn numeric_sentinel_avoids_declared_codes(
            codes in prop::collection::btree_set(0u32..100_000, 1..12)
        ) {
            let mut single = variable("Q1", VariableType::Single, 1);
            for code in &codes {
                single.insert_value(code.to_string(), String::new(), None);
            }
            let sentinel = missing_code(&single, "Q1", "");
            let value: u64 = sentinel.parse().expect("integral sentinel");
            prop_assert!(codes.iter().all(|code| u64::from(*code) != value));
        }

        #[test]
        fn literal_sentinel_avoids_declared_codes(
            codes in prop::collection::btree_set("[A-Za-z0-9]{1,4}", 1..12)
        ) {
            let mut literal = variable("Q4", VariableType::Character, 1);
            literal.format = VariableFormat::Literal;
            for code in &codes {
                literal.insert_value(code.clone(), String::new(), None);
            }
            let sentinel = missing_code(&literal, "Q4", "");
            let unquoted = sentinel.trim_matches('"');
            prop_assert!(!codes.contains(unquoted));
        }
    }
}
