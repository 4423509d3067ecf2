use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::Error;
use crate::join::LinkDepthResult;

pub const ID_COLUMN: &str = "edgeID";
pub const DEPTH_COLUMN: &str = "depth";

/// Render the depth table as CSV
///
/// Format:
/// - header `edgeID,depth`
/// - one row per result, in the given order
/// - depths in Rust's shortest `f64` form (`0`, `0.6`, `1.5`)
/// - no quoting, `\n` line endings
pub fn render_depth_table(rows: &[LinkDepthResult]) -> Result<Vec<u8>, Error> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record([ID_COLUMN, DEPTH_COLUMN])?;
    for row in rows {
        writer.write_record([row.link_id.to_string(), row.max_depth.to_string()])?;
    }

    writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))
}
