use crate::{
    collect::RangeSpec, context::ParseContext, filter::Filter, mapping::FieldMapping,
    range::RangeFilter,
};
use tracing::debug;

/// Apply caching, mapping wrap, and named registration, in that order.
///
/// The registry receives the fully wrapped filter, the same value returned.
pub fn post_process(
    ctx: &ParseContext<'_>,
    spec: &RangeSpec,
    mapping: &FieldMapping,
    range: RangeFilter,
) -> Filter {
    let filter = if spec.cache_requested {
        let cached = ctx.cache().memoize(range);
        debug!(key = %cached.key(), "memoized numeric range filter");
        Filter::Cached(cached)
    } else {
        Filter::Range(range)
    };

    let filter = ctx.wrapper().wrap(filter, mapping);

    if let Some(name) = spec.filter_name.as_deref() {
        debug!(name, "registering named filter");
        ctx.named_filters().register(name, filter.clone());
    }

    filter
}
