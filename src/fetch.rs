use crate::errors::LoadError;
use crate::models::{BoundaryCollection, BoundaryRegion, RawRow, RawValue};
use reqwest::Client;
use tracing::{info, warn};

/// Fetch one CSV table and parse it into raw rows. The header row defines
/// column names; cells get best-effort numeric coercion.
pub async fn fetch_table(client: &Client, name: &str, url: &str) -> Result<Vec<RawRow>, LoadError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|err| LoadError::fetch(name, &err))?
        .error_for_status()
        .map_err(|err| LoadError::fetch(name, &err))?;
    let body = response
        .text()
        .await
        .map_err(|err| LoadError::fetch(name, &err))?;

    let rows = parse_table(name, &body)?;
    info!("loaded {} rows from {name}", rows.len());
    Ok(rows)
}

pub fn parse_table(name: &str, csv_text: &str) -> Result<Vec<RawRow>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(csv_text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|err| LoadError::new(name, err.to_string()))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| LoadError::new(name, err.to_string()))?;
        let mut row = RawRow::default();
        for (header, cell) in headers.iter().zip(record.iter()) {
            row.insert(header, coerce(cell));
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn coerce(cell: &str) -> RawValue {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return RawValue::Empty;
    }
    match trimmed.parse::<f64>() {
        Ok(n) => RawValue::Number(n),
        Err(_) => RawValue::Text(trimmed.to_string()),
    }
}

/// Fetch the geographic boundary payload, falling back across the ordered
/// URL list. The caller caches the result; resize never refetches.
pub async fn fetch_boundaries(
    client: &Client,
    urls: &[String],
) -> Result<BoundaryCollection, LoadError> {
    for url in urls {
        match fetch_boundary_url(client, url).await {
            Ok(boundaries) => {
                info!("loaded {} boundary regions from {url}", boundaries.regions.len());
                return Ok(boundaries);
            }
            Err(err) => warn!("boundary source {url} failed: {err}"),
        }
    }
    Err(LoadError::new(
        "geographic boundaries",
        "all boundary sources failed",
    ))
}

async fn fetch_boundary_url(client: &Client, url: &str) -> Result<BoundaryCollection, LoadError> {
    const NAME: &str = "geographic boundaries";
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|err| LoadError::fetch(NAME, &err))?
        .error_for_status()
        .map_err(|err| LoadError::fetch(NAME, &err))?;
    let body = response
        .text()
        .await
        .map_err(|err| LoadError::fetch(NAME, &err))?;
    parse_boundaries(&body)
}

/// Parse a GeoJSON-style FeatureCollection into named polygon rings. Only
/// the pieces the map needs survive: a region name and its coordinate loops.
pub fn parse_boundaries(json: &str) -> Result<BoundaryCollection, LoadError> {
    const NAME: &str = "geographic boundaries";
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|err| LoadError::new(NAME, err.to_string()))?;

    let features = value
        .get("features")
        .and_then(|f| f.as_array())
        .ok_or_else(|| LoadError::new(NAME, "payload has no feature list"))?;

    let mut regions = Vec::new();
    for feature in features {
        let properties = feature.get("properties");
        let name = properties
            .and_then(|p| p.get("name").or_else(|| p.get("NAME")))
            .and_then(|n| n.as_str());
        let Some(name) = name else { continue };

        let geometry = feature.get("geometry");
        let geo_type = geometry
            .and_then(|g| g.get("type"))
            .and_then(|t| t.as_str())
            .unwrap_or("");
        let coordinates = geometry.and_then(|g| g.get("coordinates"));

        let mut rings = Vec::new();
        match (geo_type, coordinates) {
            ("Polygon", Some(coords)) => collect_polygon(coords, &mut rings),
            ("MultiPolygon", Some(coords)) => {
                for polygon in coords.as_array().into_iter().flatten() {
                    collect_polygon(polygon, &mut rings);
                }
            }
            _ => continue,
        }

        if !rings.is_empty() {
            regions.push(BoundaryRegion {
                name: name.to_string(),
                rings,
            });
        }
    }

    if regions.is_empty() {
        return Err(LoadError::new(NAME, "payload contained no named polygons"));
    }
    Ok(BoundaryCollection { regions })
}

// Outer ring only; holes do not affect a choropleth fill at this scale.
fn collect_polygon(polygon: &serde_json::Value, rings: &mut Vec<Vec<(f64, f64)>>) {
    let Some(outer) = polygon.as_array().and_then(|p| p.first()) else {
        return;
    };
    let ring: Vec<(f64, f64)> = outer
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|point| {
            let pair = point.as_array()?;
            Some((pair.first()?.as_f64()?, pair.get(1)?.as_f64()?))
        })
        .collect();
    if ring.len() >= 3 {
        rings.push(ring);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_table_coerces_numeric_cells() {
        let rows = parse_table("test", "state-full,year,teachers\nOhio,2020,45\nIowa,2021,\n")
            .expect("parse");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text("state-full"), Some("Ohio"));
        assert_eq!(rows[0].int("year"), Some(2020));
        assert_eq!(rows[0].int("teachers"), Some(45));
        assert_eq!(rows[1].int("teachers"), None);
    }

    #[test]
    fn parse_table_skips_blank_lines() {
        let rows = parse_table("test", "year,total-teachers\n2020,10\n,\n2021,20\n").expect("parse");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn parse_boundaries_reads_polygon_and_multipolygon() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "properties": {"name": "Squareland"},
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]]
                    }
                },
                {
                    "properties": {"NAME": "Twin Isles"},
                    "geometry": {
                        "type": "MultiPolygon",
                        "coordinates": [
                            [[[2.0, 2.0], [3.0, 2.0], [3.0, 3.0]]],
                            [[[4.0, 4.0], [5.0, 4.0], [5.0, 5.0]]]
                        ]
                    }
                }
            ]
        }"#;
        let boundaries = parse_boundaries(json).expect("parse");
        assert_eq!(boundaries.regions.len(), 2);
        assert_eq!(boundaries.regions[0].name, "Squareland");
        assert_eq!(boundaries.regions[0].rings.len(), 1);
        assert_eq!(boundaries.regions[1].name, "Twin Isles");
        assert_eq!(boundaries.regions[1].rings.len(), 2);
    }

    #[test]
    fn parse_boundaries_rejects_unusable_payload() {
        assert!(parse_boundaries("{\"features\": []}").is_err());
        assert!(parse_boundaries("not json").is_err());
    }
}
