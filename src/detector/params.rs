//! Parameter types configuring the detector stages.
//!
//! Every stage owns its own parameter struct; [`DetectorParams`] bundles them
//! so a single JSON document can configure a full run. Missing fields fall
//! back to the defaults, which are tuned for transcript scans of roughly
//! 1500–2500 px width.

use crate::carve::CarveParams;
use crate::glyph::GlyphParams;
use crate::skew::SkewParams;
use crate::table::TableParams;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    pub skew: SkewParams,
    pub table: TableParams,
    pub carve: CarveParams,
    pub glyph: GlyphParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "table": { "rows": { "expected_rows": 9 } } }"#;
        let params: DetectorParams = serde_json::from_str(json).expect("parse");
        assert_eq!(params.table.rows.expected_rows, 9);
        assert_eq!(params.table.rows.snap_px, 5.0);
        assert_eq!(params.skew, SkewParams::default());
    }
}
