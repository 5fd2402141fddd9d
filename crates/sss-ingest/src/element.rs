//! Triple-S element vocabulary.

/// Element kinds the parser reacts to. Anything else is `Other` and only
/// contributes its character data to the surrounding element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Element {
    Sss,
    Survey,
    Record,
    Variable,
    Position,
    Spread,
    Range,
    Value,
    Text,
    Filter,
    Size,
    Hierarchy,
    Br,
    /// `name` and `label`, assigned to the datafile or the current variable.
    Scalar(ScalarField),
    Other,
}

/// Simple text-valued elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScalarField {
    Name,
    Label,
    Date,
    Time,
    Origin,
    User,
    Version,
    Title,
}

impl ScalarField {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            ScalarField::Name => "name",
            ScalarField::Label => "label",
            ScalarField::Date => "date",
            ScalarField::Time => "time",
            ScalarField::Origin => "origin",
            ScalarField::User => "user",
            ScalarField::Version => "version",
            ScalarField::Title => "title",
        }
    }

    /// Fields copied into the datafile while in the survey section.
    pub(crate) fn is_survey_field(self) -> bool {
        !matches!(self, ScalarField::Label)
    }

    /// Fields copied into the current variable while in the record section.
    pub(crate) fn is_variable_field(self) -> bool {
        matches!(self, ScalarField::Name | ScalarField::Label)
    }
}

impl Element {
    pub(crate) fn from_local_name(name: &[u8]) -> Self {
        match name {
            b"sss" => Element::Sss,
            b"survey" => Element::Survey,
            b"record" => Element::Record,
            b"variable" => Element::Variable,
            b"position" => Element::Position,
            b"spread" => Element::Spread,
            b"range" => Element::Range,
            b"value" => Element::Value,
            b"text" => Element::Text,
            b"filter" => Element::Filter,
            b"size" => Element::Size,
            b"hierarchy" => Element::Hierarchy,
            b"br" => Element::Br,
            b"name" => Element::Scalar(ScalarField::Name),
            b"label" => Element::Scalar(ScalarField::Label),
            b"date" => Element::Scalar(ScalarField::Date),
            b"time" => Element::Scalar(ScalarField::Time),
            b"origin" => Element::Scalar(ScalarField::Origin),
            b"user" => Element::Scalar(ScalarField::User),
            b"version" => Element::Scalar(ScalarField::Version),
            b"title" => Element::Scalar(ScalarField::Title),
            _ => Element::Other,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Element::Sss => "sss",
            Element::Survey => "survey",
            Element::Record => "record",
            Element::Variable => "variable",
            Element::Position => "position",
            Element::Spread => "spread",
            Element::Range => "range",
            Element::Value => "value",
            Element::Text => "text",
            Element::Filter => "filter",
            Element::Size => "size",
            Element::Hierarchy => "hierarchy",
            Element::Br => "br",
            Element::Scalar(field) => field.as_str(),
            Element::Other => "other",
        }
    }

    /// Elements whose own character data becomes a value on close.
    pub(crate) fn collects_content(self) -> bool {
        matches!(
            self,
            Element::Value | Element::Filter | Element::Size | Element::Scalar(_)
        )
    }

    /// Elements that only make sense inside a `variable`.
    pub(crate) fn needs_variable(self) -> bool {
        matches!(
            self,
            Element::Position
                | Element::Spread
                | Element::Range
                | Element::Value
                | Element::Filter
                | Element::Size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_names() {
        assert_eq!(Element::from_local_name(b"variable"), Element::Variable);
        assert_eq!(
            Element::from_local_name(b"label"),
            Element::Scalar(ScalarField::Label)
        );
        assert_eq!(Element::from_local_name(b"values"), Element::Other);
    }

    #[test]
    fn label_is_variable_only() {
        assert!(!ScalarField::Label.is_survey_field());
        assert!(ScalarField::Label.is_variable_field());
        assert!(ScalarField::Title.is_survey_field());
        assert!(!ScalarField::Title.is_variable_field());
    }
}
