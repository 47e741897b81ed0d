//! Best-effort extraction of an EPSG code from a GML `srsName`.
//!
//! This lookup feeds the BBox decoder's tolerated failure path: an
//! unrecognized reference system never aborts a decode.

use thiserror::Error;

#[derive(Error, Debug)]
#[error("unrecognized srsName '{0}'")]
pub struct UnknownCrs(pub String);

/// Resolves an `srsName` to a normalized `EPSG:<code>` string.
///
/// Understands the plain `EPSG:4326` form, the OGC URN forms
/// `urn:ogc:def:crs:EPSG::4326` and `urn:ogc:def:crs:EPSG:6.11:4326`, and
/// the HTTP URI form `http://www.opengis.net/def/crs/EPSG/0/4326`.
pub fn lookup_code(srs_name: &str) -> Result<String, UnknownCrs> {
    let srs = srs_name.trim();

    if let Some(code) = srs.strip_prefix("EPSG:") {
        return normalize(code, srs);
    }

    if srs.starts_with("urn:") {
        let parts: Vec<&str> = srs.split(':').collect();
        // urn:ogc:def:crs:EPSG:<version?>:<code>
        if parts.len() == 7
            && parts[1] == "ogc"
            && parts[2] == "def"
            && parts[3] == "crs"
            && parts[4] == "EPSG"
        {
            return normalize(parts[6], srs);
        }
    }

    if srs.starts_with("http://") || srs.starts_with("https://") {
        let parts: Vec<&str> = srs.split('/').collect();
        // .../def/crs/EPSG/<version>/<code>
        if parts.len() >= 3 && parts[parts.len() - 3] == "EPSG" {
            return normalize(parts[parts.len() - 1], srs);
        }
    }

    Err(UnknownCrs(srs_name.to_string()))
}

fn normalize(code: &str, srs: &str) -> Result<String, UnknownCrs> {
    if !code.is_empty() && code.chars().all(|c| c.is_ascii_digit()) {
        Ok(format!("EPSG:{}", code))
    } else {
        Err(UnknownCrs(srs.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_epsg_form() {
        assert_eq!(lookup_code("EPSG:4326").unwrap(), "EPSG:4326");
    }

    #[test]
    fn test_urn_forms() {
        assert_eq!(lookup_code("urn:ogc:def:crs:EPSG::4326").unwrap(), "EPSG:4326");
        assert_eq!(
            lookup_code("urn:ogc:def:crs:EPSG:6.11:32632").unwrap(),
            "EPSG:32632"
        );
    }

    #[test]
    fn test_http_uri_form() {
        assert_eq!(
            lookup_code("http://www.opengis.net/def/crs/EPSG/0/3857").unwrap(),
            "EPSG:3857"
        );
    }

    #[test]
    fn test_unrecognized_forms_fail() {
        assert!(lookup_code("CRS:84").is_err());
        assert!(lookup_code("urn:ogc:def:crs:OGC:1.3:CRS84").is_err());
        assert!(lookup_code("EPSG:not-a-number").is_err());
        assert!(lookup_code("").is_err());
    }
}
