//! Styled `GeoJSON` export of the density map.
//!
//! Every boundary becomes one feature carrying its counts, density tier
//! and current style, so the map can be drawn by any `GeoJSON` renderer
//! without re-running the aggregation.

use std::io::Write;

use geojson::{Geometry, Value};

use crate::session::MapSession;

/// Builds the `GeoJSON` feature for one region.
fn region_feature(session: &MapSession, name: &str) -> Option<serde_json::Value> {
    let feature = session.boundaries().lookup(name)?;
    let detail = session.region_detail(name)?;
    let geometry = Geometry::new(Value::from(feature.polygon()));

    Some(serde_json::json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "name": detail.region_name,
            "tier": detail.tier,
            "tierLabel": detail.tier.label(),
            "counts": detail.counts,
            "style": detail.style,
        },
    }))
}

/// Exports every region as a `FeatureCollection`, in sorted name order.
#[must_use]
pub fn feature_collection(session: &MapSession) -> serde_json::Value {
    let features: Vec<_> = session
        .boundaries()
        .all_names()
        .iter()
        .filter_map(|name| region_feature(session, name))
        .collect();

    serde_json::json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// Writes every region as newline-delimited `GeoJSON` and returns the
/// number of features written.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_geojsonseq<W: Write>(
    session: &MapSession,
    mut writer: W,
) -> Result<usize, serde_json::Error> {
    let mut count = 0;

    for name in session.boundaries().all_names() {
        let Some(feature) = region_feature(session, name) else {
            continue;
        };
        serde_json::to_writer(&mut writer, &feature)?;
        writer.write_all(b"\n").map_err(serde_json::Error::io)?;
        count += 1;
    }

    writer.flush().map_err(serde_json::Error::io)?;
    log::info!("Exported {count} municipality features");
    Ok(count)
}
