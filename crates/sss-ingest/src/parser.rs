//! Event-driven Triple-S metadata parser.
//!
//! The parser walks quick-xml events and keeps its own state: the document
//! section it is in, the index of the variable being filled, and a stack of
//! text contexts deciding where character data goes. Nothing is inferred from
//! the shape of the partially built model.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};
use tracing::{debug, info, warn};

use sss_model::{Datafile, Metadata, Record, RecordFormat, Variable, VariableType};

use crate::element::{Element, ScalarField};
use crate::error::{IngestError, Result};
use crate::text::{TextBuffer, TextContext, clean_text};

/// Options for metadata parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Strip `<...>` markup from labels, value labels and text.
    pub remove_html: bool,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_remove_html(mut self, enable: bool) -> Self {
        self.remove_html = enable;
        self
    }
}

/// Parse a metadata file.
pub fn parse_metadata_file(path: &Path, options: &ParseOptions) -> Result<Metadata> {
    let file = File::open(path).map_err(|err| IngestError::io(path, err))?;
    info!(path = %path.display(), "parsing metadata");
    parse_metadata(BufReader::new(file), options)
}

/// Parse metadata held in memory.
pub fn parse_metadata_str(xml: &str, options: &ParseOptions) -> Result<Metadata> {
    parse_metadata(xml.as_bytes(), options)
}

/// Parse metadata from any buffered source.
///
/// Fails on malformed XML, on a `hierarchy` element, and when the document
/// does not contain exactly one `record`.
pub fn parse_metadata<R: BufRead>(source: R, options: &ParseOptions) -> Result<Metadata> {
    let mut reader = Reader::from_reader(source);
    let mut state = ParserState::new(*options);
    let mut buf = Vec::new();

    loop {
        let position = reader.buffer_position() as u64;
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(start)) => {
                let element = Element::from_local_name(start.local_name().as_ref());
                state.open(position)?;
                state.start(element, &start, position)?;
            }
            Ok(Event::Empty(start)) => {
                let element = Element::from_local_name(start.local_name().as_ref());
                state.open(position)?;
                state.start(element, &start, position)?;
                state.end(element);
                state.close();
            }
            Ok(Event::End(end)) => {
                state.end(Element::from_local_name(end.local_name().as_ref()));
                state.close();
            }
            Ok(Event::Text(text)) => {
                let text = text
                    .decode()
                    .map_err(|err| IngestError::xml(position, err))?;
                state.characters(&text);
            }
            Ok(Event::CData(data)) => {
                let text = data
                    .decode()
                    .map_err(|err| IngestError::xml(position, err))?;
                state.characters(&text);
            }
            Ok(Event::GeneralRef(reference)) => {
                let text = resolve_reference(&reference)
                    .map_err(|message| IngestError::xml(position, message))?;
                state.characters(&text);
            }
            Ok(Event::Eof) => {
                if state.depth > 0 {
                    return Err(IngestError::xml(
                        position,
                        format!("document ends with {} unclosed element(s)", state.depth),
                    ));
                }
                break;
            }
            // Declarations, doctype, comments and processing instructions.
            Ok(_) => {}
            Err(err) => return Err(IngestError::xml(reader.error_position() as u64, err)),
        }
        buf.clear();
    }

    state.finish()
}

fn resolve_reference(reference: &BytesRef<'_>) -> std::result::Result<String, String> {
    if let Some(ch) = reference.resolve_char_ref().map_err(|err| err.to_string())? {
        return Ok(ch.to_string());
    }
    let name = reference.decode().map_err(|err| err.to_string())?;
    resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| format!("unknown entity &{name};"))
}

/// Part of the document the parser is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Start,
    Survey,
    Record,
}

/// A `value` element waiting for its label text.
#[derive(Debug)]
struct PendingValue {
    code: Option<String>,
    score: Option<String>,
}

struct ParserState {
    options: ParseOptions,
    seen_sss: bool,
    /// Number of currently open elements.
    depth: usize,
    root_closed: bool,
    section: Section,
    datafile: Datafile,
    record: Option<Record>,
    variables: Vec<Variable>,
    /// Index into `variables` of the variable being filled.
    current: Option<usize>,
    contexts: Vec<TextContext>,
    content: TextBuffer,
    rich: TextBuffer,
    pending_value: Option<PendingValue>,
    text_mode: Option<String>,
}

impl ParserState {
    fn new(options: ParseOptions) -> Self {
        Self {
            options,
            seen_sss: false,
            depth: 0,
            root_closed: false,
            section: Section::Start,
            datafile: Datafile::new(),
            record: None,
            variables: Vec::new(),
            current: None,
            contexts: Vec::new(),
            content: TextBuffer::default(),
            rich: TextBuffer::default(),
            pending_value: None,
            text_mode: None,
        }
    }

    fn context(&self) -> TextContext {
        self.contexts.last().copied().unwrap_or(TextContext::Content)
    }

    fn buffer(&mut self) -> &mut TextBuffer {
        match self.context() {
            TextContext::Content => &mut self.content,
            TextContext::Rich => &mut self.rich,
        }
    }

    fn current_variable(&mut self) -> Option<&mut Variable> {
        self.current.and_then(|index| self.variables.get_mut(index))
    }

    fn clean(&self, text: &str) -> String {
        clean_text(text, self.options.remove_html)
    }

    fn open(&mut self, position: u64) -> Result<()> {
        if self.root_closed {
            return Err(IngestError::xml(
                position,
                "element found after the root element was closed",
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.root_closed = true;
        }
    }

    fn start(&mut self, element: Element, start: &BytesStart<'_>, position: u64) -> Result<()> {
        if !self.seen_sss && element != Element::Sss {
            return Err(IngestError::MissingSss);
        }
        if element.collects_content() {
            self.content.clear();
        }
        if element.needs_variable() && self.current.is_none() {
            return Err(IngestError::Misplaced {
                element: element.as_str().to_string(),
                context: "a variable",
            });
        }

        match element {
            Element::Sss => {
                self.seen_sss = true;
                self.datafile
                    .set_opt("version", attribute(start, "version", position)?);
                self.datafile
                    .set_opt("languages", attribute(start, "languages", position)?);
                self.datafile
                    .set_opt("mode", attribute(start, "modes", position)?);
            }
            Element::Survey => self.section = Section::Survey,
            Element::Record => {
                if self.record.is_some() {
                    return Err(IngestError::MultipleRecords { position });
                }
                let format = match attribute(start, "format", position)? {
                    Some(value) => value
                        .parse::<RecordFormat>()
                        .map_err(|_| invalid(element, "format", &value))?,
                    None => RecordFormat::Fixed,
                };
                self.record = Some(Record {
                    ident: attribute(start, "ident", position)?,
                    format,
                    skip: number_attribute(start, element, "skip", position)?,
                    href: attribute(start, "href", position)?,
                });
                self.section = Section::Record;
            }
            Element::Variable => {
                if self.section != Section::Record {
                    return Err(IngestError::Misplaced {
                        element: element.as_str().to_string(),
                        context: "a record",
                    });
                }
                let ident = attribute(start, "ident", position)?;
                let var_type = match attribute(start, "type", position)? {
                    Some(value) => match value.parse::<VariableType>() {
                        Ok(ty) => Some(ty),
                        Err(message) => {
                            warn!(ident = ?ident, %message, "unsupported variable type");
                            None
                        }
                    },
                    None => None,
                };
                let mut variable = Variable::new(ident, var_type);
                if let Some(usage) = attribute(start, "use", position)? {
                    variable.usage = usage.as_str().into();
                }
                if let Some(format) = attribute(start, "format", position)? {
                    variable.format = format.as_str().into();
                }
                self.variables.push(variable);
                self.current = Some(self.variables.len() - 1);
            }
            Element::Position => {
                let begin = number_attribute(start, element, "start", position)?;
                let finish = number_attribute(start, element, "finish", position)?;
                if let Some(variable) = self.current_variable() {
                    variable.position.start = begin;
                    variable.position.finish = finish;
                }
            }
            Element::Spread => {
                let subfields = number_attribute(start, element, "subfields", position)?;
                let width = number_attribute(start, element, "width", position)?;
                if let Some(variable) = self.current_variable() {
                    variable.spread.subfields = subfields;
                    variable.spread.width = width;
                }
            }
            Element::Range => {
                let from = attribute(start, "from", position)?;
                let to = attribute(start, "to", position)?;
                if let Some(variable) = self.current_variable() {
                    variable.range.from = from;
                    variable.range.to = to;
                }
            }
            Element::Value => {
                self.pending_value = Some(PendingValue {
                    code: attribute(start, "code", position)?,
                    score: attribute(start, "score", position)?,
                });
            }
            // Outside a variable (e.g. a language-tagged survey title) the
            // text is transparent and feeds the enclosing element.
            Element::Text if self.current.is_some() => {
                self.text_mode = attribute(start, "mode", position)?;
                self.rich.clear();
                self.contexts.push(TextContext::Rich);
            }
            Element::Text => {}
            Element::Hierarchy => return Err(IngestError::Hierarchy),
            Element::Filter
            | Element::Size
            | Element::Br
            | Element::Scalar(_)
            | Element::Other => {}
        }
        Ok(())
    }

    fn end(&mut self, element: Element) {
        match element {
            Element::Br => self.buffer().push_break(),
            Element::Scalar(field) => self.end_scalar(field),
            Element::Filter => {
                let filter = self.content.take();
                let filter = filter.trim();
                if let Some(variable) = self.current_variable() {
                    if !filter.is_empty() {
                        variable.filter = Some(filter.to_string());
                    }
                }
            }
            Element::Size => {
                let size = self.content.take();
                if let Some(variable) = self.current_variable() {
                    match size.trim().parse::<usize>() {
                        Ok(size) => variable.size = Some(size),
                        Err(_) => {
                            warn!(variable = %variable.display_name(), size = %size, "ignoring non-numeric size");
                        }
                    }
                }
            }
            Element::Value => {
                let raw = self.content.take();
                let label = self.clean(raw.trim());
                let pending = self.pending_value.take();
                if let (Some(pending), Some(variable)) = (pending, self.current_variable()) {
                    match pending.code {
                        Some(code) => variable.insert_value(code, label, pending.score),
                        None => {
                            warn!(variable = %variable.display_name(), "value element without code");
                        }
                    }
                }
            }
            Element::Text => {
                if self.context() != TextContext::Rich {
                    return;
                }
                self.contexts.pop();
                let raw = self.rich.take();
                let body = self.clean(raw.trim());
                let entry = match self.text_mode.take() {
                    Some(mode) => format!("Mode: {mode}.  {body}"),
                    None => body,
                };
                if let Some(variable) = self.current_variable() {
                    variable.text.push(entry);
                }
            }
            Element::Variable => {
                if let Some(variable) = self.current_variable() {
                    debug!(
                        ident = ?variable.ident,
                        name = %variable.display_name(),
                        var_type = ?variable.var_type,
                        values = variable.values.len(),
                        "parsed variable"
                    );
                }
                self.current = None;
            }
            Element::Sss
            | Element::Survey
            | Element::Record
            | Element::Position
            | Element::Spread
            | Element::Range
            | Element::Hierarchy
            | Element::Other => {}
        }
    }

    fn end_scalar(&mut self, field: ScalarField) {
        if self.content.is_empty() {
            return;
        }
        let raw = self.content.take();
        let text = self.clean(raw.trim());
        match self.section {
            Section::Start | Section::Survey if field.is_survey_field() => {
                self.datafile.set(field.as_str(), text);
            }
            Section::Record if field.is_variable_field() => match self.current_variable() {
                Some(variable) => match field {
                    ScalarField::Name => variable.name = Some(text),
                    _ => variable.label = Some(text),
                },
                None => debug!(field = field.as_str(), "ignoring record-level text"),
            },
            _ => {}
        }
    }

    fn characters(&mut self, text: &str) {
        self.buffer().push(text);
    }

    fn finish(self) -> Result<Metadata> {
        if !self.seen_sss {
            return Err(IngestError::MissingSss);
        }
        let record = self.record.ok_or(IngestError::MissingRecord)?;
        info!(
            record_format = %record.format,
            variable_count = self.variables.len(),
            "metadata parsed"
        );
        Ok(Metadata {
            datafile: self.datafile,
            record,
            variables: self.variables,
        })
    }
}

fn attribute(start: &BytesStart<'_>, name: &str, position: u64) -> Result<Option<String>> {
    for attr in start.attributes() {
        let attr = attr.map_err(|err| IngestError::xml(position, err))?;
        if attr.key.local_name().as_ref() == name.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|err| IngestError::xml(position, err))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn number_attribute(
    start: &BytesStart<'_>,
    element: Element,
    name: &str,
    position: u64,
) -> Result<Option<usize>> {
    match attribute(start, name, position)? {
        Some(value) => value
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| invalid(element, name, &value)),
        None => Ok(None),
    }
}

fn invalid(element: Element, attribute: &str, value: &str) -> IngestError {
    IngestError::InvalidAttribute {
        element: element.as_str().to_string(),
        attribute: attribute.to_string(),
        value: value.to_string(),
    }
}
