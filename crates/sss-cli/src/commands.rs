use std::io;

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use tracing::info_span;

use sss_cli::{
    ConversionOutcome, ConversionRequest, FileHandles, NoTranslation, StandaloneSession,
    run_conversion,
};
use sss_ingest::{ParseOptions, parse_metadata_file};
use sss_syntax::DataEncoding;

use crate::cli::{ConvertArgs, DataEncodingArg, InspectArgs};

pub fn run_convert(args: &ConvertArgs) -> Result<ConversionOutcome> {
    let request = conversion_request(args);
    let handles: FileHandles = args
        .handles
        .iter()
        .map(|handle| (handle.name.clone(), handle.path.clone()))
        .collect();

    let mut session = StandaloneSession::new(io::stdout().lock(), handles);
    if args.no_unicode {
        let locale = Encoding::for_label(args.locale_encoding.trim().as_bytes())
            .with_context(|| format!("unknown locale encoding {:?}", args.locale_encoding))?;
        session = session.with_locale(locale);
    }

    let outcome = run_conversion(&request, &mut session, &NoTranslation)?;
    Ok(outcome)
}

fn conversion_request(args: &ConvertArgs) -> ConversionRequest {
    let mut request = ConversionRequest::new(args.metadata.clone());
    request.data_file = args.data.clone();
    request.syntax_file = args.syntax.clone();
    request.execute = args.execute;
    request.string_missing_code = args.string_missing_code.clone();
    request.max_record_length = args.max_record_length;
    request.data_encoding = match args.data_encoding {
        DataEncodingArg::Utf8 => DataEncoding::Utf8,
        DataEncodingArg::Locale => DataEncoding::Locale,
    };
    request.remove_html = args.remove_html;
    request.full_label_attribute = !args.no_full_label;
    request.dichotomy_labels = args.dichotomy_labels.clone();
    request.score_recode = args.score_recode;
    request.locale_encoding = args.locale_encoding.clone();
    request
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let span = info_span!("inspect", metadata = %args.metadata.display());
    let _guard = span.enter();
    let options = ParseOptions::new().with_remove_html(args.remove_html);
    let metadata = parse_metadata_file(&args.metadata, &options)
        .with_context(|| format!("read metadata {}", args.metadata.display()))?;
    let json = serde_json::to_string_pretty(&metadata).context("serialize metadata")?;
    println!("{json}");
    Ok(())
}
