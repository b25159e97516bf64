use std::path::{Path, PathBuf};

use cyclereach_core::{
    Destination, Error,
    export::{destinations_to_geojson, graph_to_geojson, segments_to_geojson, to_geojson_string},
    loading::{AnalysisReport, PreparedNetwork},
};
use tracing::info;

/// Writes segments, the routable graph, the report and per-scenario
/// destinations into `dir`, returning the written files
pub fn write_outputs(
    dir: &Path,
    network: &PreparedNetwork,
    destinations: &[Destination],
    report: &AnalysisReport,
) -> Result<Vec<PathBuf>, Error> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let mut write = |name: String, content: String| -> Result<(), Error> {
        let path = dir.join(name);
        std::fs::write(&path, content)?;
        info!("Wrote {}", path.display());
        written.push(path);
        Ok(())
    };

    write(
        "segments.geojson".to_string(),
        to_geojson_string(&segments_to_geojson(&network.segments))?,
    )?;
    write(
        "graph.geojson".to_string(),
        to_geojson_string(&graph_to_geojson(&network.graph))?,
    )?;
    write(
        "report.json".to_string(),
        serde_json::to_string_pretty(report)?,
    )?;
    for scenario in &report.scenarios {
        write(
            format!("destinations_{}.geojson", file_stem(&scenario.name)),
            to_geojson_string(&destinations_to_geojson(destinations, scenario)?)?,
        )?;
    }

    Ok(written)
}

/// Lowercase ASCII alphanumerics, other characters become `_`
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_names_become_file_stems() {
        assert_eq!(file_stem("Bike friendly, 15 min"), "bike_friendly__15_min");
        assert_eq!(file_stem("good"), "good");
    }
}
