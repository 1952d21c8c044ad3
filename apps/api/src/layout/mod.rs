// Layout: font metrics, line breaking and the two content trimmers.
// Everything here is pure and CPU-bound; HTTP callers run it inside
// tokio::task::spawn_blocking.

pub mod budget;
pub mod font_metrics;
pub mod page_limit;
pub mod wrap;

pub use font_metrics::FontFace;
