use crate::{
    collect::{RangeSpec, collect},
    context::ParseContext,
    error::{RangeParseError, StructuralError},
    filter::Filter,
    mapping::FieldResolution,
    obs::sink::{MetricsEvent, ParseOutcome, record},
    parser::{FilterParser, post::post_process},
    range::build_range_filter,
    token::TokenSource,
};
use tracing::{debug, warn};

///
/// NumericRangeFilterParser
///
/// Parses `{ "<field>": { <bound keys> }, "_name"?, "_cache"? }` into a
/// typed range filter over the field's declared numeric kind.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NumericRangeFilterParser;

impl NumericRangeFilterParser {
    pub const NAME: &'static str = "numeric_range";
    pub const NAMES: &'static [&'static str] = &[Self::NAME, "numericRange"];
}

impl FilterParser for NumericRangeFilterParser {
    fn names(&self) -> &'static [&'static str] {
        Self::NAMES
    }

    fn parse(
        &self,
        ctx: &ParseContext<'_>,
        tokens: &mut dyn TokenSource,
    ) -> Result<Filter, RangeParseError> {
        record(MetricsEvent::ParseStart);

        let result = parse_numeric_range(ctx, tokens);
        let outcome = match &result {
            Ok(_) => ParseOutcome::Built,
            Err(err) => ParseOutcome::Failed(err.class()),
        };
        let field = match &result {
            Ok(filter) => Some(filter.range().field()),
            Err(err) => err.field(),
        };
        record(MetricsEvent::ParseFinish { field, outcome });

        result
    }
}

fn parse_numeric_range(
    ctx: &ParseContext<'_>,
    tokens: &mut dyn TokenSource,
) -> Result<Filter, RangeParseError> {
    let spec = collect(tokens, RangeSpec::new(ctx.cache_by_default()))?;
    let field = spec
        .field_name
        .as_deref()
        .ok_or(StructuralError::MissingField)?;

    let mapping = match ctx.resolver().resolve(field) {
        FieldResolution::Numeric(mapping) => mapping,
        FieldResolution::NotNumeric => return Err(RangeParseError::not_numeric(field)),
        FieldResolution::NotFound => return Err(RangeParseError::unknown_field(field)),
    };
    debug!(
        field,
        storage = %mapping.storage_name,
        kind = %mapping.kind,
        "resolved numeric range field"
    );

    let range = build_range_filter(field, &mapping, &spec)?;
    if range.range().is_inverted() {
        warn!(field, "numeric range lower bound exceeds upper bound; filter matches nothing");
    }

    Ok(post_process(ctx, &spec, &mapping, range))
}
