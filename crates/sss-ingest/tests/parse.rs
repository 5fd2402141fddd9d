//! Tests for Triple-S metadata parsing.

use std::io::Write;

use sss_ingest::{IngestError, ParseOptions, parse_metadata_file, parse_metadata_str};
use sss_model::{MultipleKind, RecordFormat, VariableType};

const SURVEY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE sss SYSTEM "triple-s.dtd">
<sss version="2.0" languages="en" modes="CATI">
  <date>2014-01-31</date>
  <origin>Survey tool</origin>
  <survey>
    <name>BRANDS</name>
    <title>Brand &amp; usage</title>
    <record ident="A" format="csv" skip="1">
      <variable ident="1" type="single" use="serial">
        <name>Q1</name>
        <label>Gender<br/>of respondent</label>
        <position start="1"/>
        <values>
          <value code="1" score="10">Male</value>
          <value code="2" score="20">Female</value>
        </values>
        <filter>Q0 = 1</filter>
      </variable>
      <variable ident="2" type="multiple">
        <name>Q2</name>
        <label>Brands used</label>
        <position start="2"/>
        <spread subfields="3" width="2"/>
        <values>
          <value code="1">Alpha</value>
          <value code="2">Beta</value>
        </values>
        <text mode="CATI">Read &lt;b&gt;all&lt;/b&gt; brands</text>
      </variable>
      <variable ident="3" type="quantity" format="numeric">
        <name>Q3</name>
        <position start="3"/>
        <values><range from="0" to="99"/></values>
        <size>4</size>
      </variable>
      <variable ident="4" type="character" format="literal">
        <name>Q4</name>
        <position start="4"/>
        <text>Open &#65;nswer</text>
      </variable>
    </record>
  </survey>
</sss>
"#;

fn parse(xml: &str) -> sss_ingest::Result<sss_model::Metadata> {
    parse_metadata_str(xml, &ParseOptions::default())
}

#[test]
fn parses_survey_and_record() {
    let metadata = parse(SURVEY).expect("parse survey");
    assert_eq!(metadata.variables.len(), 4);
    assert_eq!(metadata.record.format, RecordFormat::Csv);
    assert_eq!(metadata.record.skip, Some(1));
    assert_eq!(metadata.record.ident.as_deref(), Some("A"));

    let datafile = &metadata.datafile;
    assert_eq!(datafile.get("version"), Some("2.0"));
    assert_eq!(datafile.get("languages"), Some("en"));
    assert_eq!(datafile.get("mode"), Some("CATI"));
    assert_eq!(datafile.get("date"), Some("2014-01-31"));
    assert_eq!(datafile.get("name"), Some("BRANDS"));
    assert_eq!(datafile.get("title"), Some("Brand & usage"));
}

#[test]
fn captures_values_scores_and_filter() {
    let metadata = parse(SURVEY).expect("parse survey");
    let q1 = &metadata.variables[0];
    assert_eq!(q1.name.as_deref(), Some("Q1"));
    assert_eq!(q1.var_type, Some(VariableType::Single));
    assert_eq!(q1.usage.as_str(), "serial");
    assert_eq!(q1.label.as_deref(), Some("Gender - of respondent"));
    assert_eq!(q1.values.get("2").map(String::as_str), Some("Female"));
    assert_eq!(q1.scores.get("1"), Some(&Some("10".to_string())));
    assert_eq!(q1.filter.as_deref(), Some("Q0 = 1"));
    assert_eq!(q1.position.start, Some(1));
}

#[test]
fn captures_spread_range_size_and_text() {
    let metadata = parse(SURVEY).expect("parse survey");
    let q2 = &metadata.variables[1];
    assert_eq!(q2.multiple_kind(), Some(MultipleKind::Category));
    assert_eq!(q2.spread.subfields, Some(3));
    assert_eq!(q2.spread.width, Some(2));
    assert_eq!(q2.text, vec!["Mode: CATI.  Read <b>all</b> brands".to_string()]);
    assert!(q2.scores.values().all(Option::is_none));

    let q3 = &metadata.variables[2];
    assert_eq!(q3.range.from.as_deref(), Some("0"));
    assert_eq!(q3.range.to.as_deref(), Some("99"));
    assert_eq!(q3.size, Some(4));
    assert!(q3.label.is_none());

    let q4 = &metadata.variables[3];
    assert!(q4.format.is_literal());
    assert_eq!(q4.text, vec!["Open Answer".to_string()]);
}

#[test]
fn removes_markup_when_requested() {
    let options = ParseOptions::new().with_remove_html(true);
    let metadata = parse_metadata_str(SURVEY, &options).expect("parse survey");
    assert_eq!(metadata.variables[1].text, vec!["Mode: CATI.  Read all brands".to_string()]);
    // Breaks are turned into separators before markup is stripped.
    assert_eq!(
        metadata.variables[0].label.as_deref(),
        Some("Gender - of respondent")
    );
}

#[test]
fn fixed_is_the_default_record_format() {
    let xml = r#"<sss><survey><record ident="A">
        <variable ident="1" type="logical"><name>L</name><position start="1" finish="1"/></variable>
    </record></survey></sss>"#;
    let metadata = parse(xml).expect("parse");
    assert_eq!(metadata.record.format, RecordFormat::Fixed);
    assert_eq!(metadata.variables[0].position.finish, Some(1));
}

#[test]
fn unknown_variable_type_is_kept_untyped() {
    let xml = r#"<sss><survey><record ident="A">
        <variable ident="1" type="bogus"><name>X</name></variable>
    </record></survey></sss>"#;
    let metadata = parse(xml).expect("parse");
    assert_eq!(metadata.variables.len(), 1);
    assert_eq!(metadata.variables[0].var_type, None);
}

#[test]
fn hierarchy_is_rejected() {
    let xml = r#"<sss><survey><record ident="A"/><hierarchy/></survey></sss>"#;
    assert!(matches!(parse(xml), Err(IngestError::Hierarchy)));
}

#[test]
fn second_record_is_rejected() {
    let xml = r#"<sss><survey><record ident="A"/><record ident="B"/></survey></sss>"#;
    assert!(matches!(parse(xml), Err(IngestError::MultipleRecords { .. })));
}

#[test]
fn missing_record_is_rejected() {
    let xml = r#"<sss><survey><name>EMPTY</name></survey></sss>"#;
    assert!(matches!(parse(xml), Err(IngestError::MissingRecord)));
}

#[test]
fn root_must_be_sss() {
    let xml = r#"<survey><record ident="A"/></survey>"#;
    assert!(matches!(parse(xml), Err(IngestError::MissingSss)));
}

#[test]
fn variable_outside_record_is_rejected() {
    let xml = r#"<sss><survey><variable ident="1" type="single"/></survey></sss>"#;
    assert!(matches!(parse(xml), Err(IngestError::Misplaced { .. })));
}

#[test]
fn invalid_position_is_rejected() {
    let xml = r#"<sss><survey><record ident="A">
        <variable ident="1" type="single"><position start="one"/></variable>
    </record></survey></sss>"#;
    let err = parse(xml).expect_err("invalid start");
    match err {
        IngestError::InvalidAttribute {
            element,
            attribute,
            value,
        } => {
            assert_eq!(element, "position");
            assert_eq!(attribute, "start");
            assert_eq!(value, "one");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_xml_is_rejected() {
    let xml = r#"<sss><survey><record ident="A"></survey></sss>"#;
    assert!(matches!(parse(xml), Err(IngestError::Xml { .. })));
}

#[test]
fn truncated_document_is_rejected() {
    let xml = r#"<sss version="2.0"><survey><record ident="A">
        <variable ident="1" type="single"><name>Q1</name><position start="1"/>"#;
    let err = parse(xml).expect_err("unclosed elements");
    assert!(matches!(err, IngestError::Xml { .. }));
    assert!(err.to_string().contains("unclosed"));
}

#[test]
fn second_root_is_rejected() {
    let xml = r#"<sss><survey><record ident="A"/></survey></sss><sss/>"#;
    assert!(matches!(parse(xml), Err(IngestError::Xml { .. })));
}

#[test]
fn indented_text_stays_on_one_line() {
    let xml = r#"<sss version="2.0">
  <survey>
    <record ident="A">
      <variable ident="1" type="single">
        <name>Q1</name>
        <label>Which brand
          do you use</label>
        <position start="1"/>
        <values>
          <value code="1">Alpha
            or Beta</value>
        </values>
        <text>
          Read out
          all brands
        </text>
        <text mode="CAPI">
          Show card
        </text>
      </variable>
    </record>
  </survey>
</sss>"#;
    let metadata = parse(xml).expect("parse indented survey");
    let variable = &metadata.variables[0];
    assert_eq!(variable.label.as_deref(), Some("Which brand do you use"));
    assert_eq!(variable.values["1"], "Alpha or Beta");
    assert_eq!(
        variable.text,
        vec!["Read out all brands", "Mode: CAPI.  Show card"]
    );
}

#[test]
fn parses_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(SURVEY.as_bytes()).expect("write metadata");
    let metadata =
        parse_metadata_file(file.path(), &ParseOptions::default()).expect("parse file");
    assert_eq!(metadata.variables.len(), 4);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.xml");
    let err = parse_metadata_file(&path, &ParseOptions::default()).expect_err("missing file");
    assert!(err.to_string().contains("absent.xml"));
}
