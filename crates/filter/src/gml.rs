//! Boundary decoders for the GML subset carried by filters and feed
//! entries: envelopes and point/line/polygon geometry.

use crate::gml;
use geosync_bxml::{Token, XmlCursor};
use geosync_decode::{text_content, DecodeError, ElementDecoder};
use geosync_types::{Coord, Envelope, Geometry, QName};

/// Decodes a `gml:Envelope` (corner pair) or the older `gml:Box`
/// (coordinates list) into an [`Envelope`].
pub struct EnvelopeDecoder {
    names: Vec<QName>,
}

impl EnvelopeDecoder {
    pub fn new() -> Self {
        Self {
            names: vec![gml("Envelope"), gml("Box")],
        }
    }
}

impl Default for EnvelopeDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementDecoder for EnvelopeDecoder {
    type Output = Envelope;

    fn names(&self) -> &[QName] {
        &self.names
    }

    fn decode_body(&self, cursor: &mut XmlCursor, name: &QName) -> Result<Envelope, DecodeError> {
        let srs_name = cursor.attribute("srsName").map(str::to_owned);
        match name.local.as_str() {
            "Envelope" => {
                let mut lower: Option<Coord> = None;
                let mut upper: Option<Coord> = None;
                loop {
                    cursor.next_tag()?;
                    match cursor.token() {
                        Token::Start(child) => {
                            let child = child.clone();
                            let text = element_text(cursor)?;
                            match child.local.as_str() {
                                "lowerCorner" => lower = Some(parse_pos(&text, &child)?),
                                "upperCorner" => upper = Some(parse_pos(&text, &child)?),
                                _ => {
                                    return Err(DecodeError::UnexpectedElement {
                                        found: child,
                                        expected: "lowerCorner or upperCorner".to_string(),
                                    });
                                }
                            }
                        }
                        Token::End(_) => break,
                        _ => return Err(geosync_bxml::BxmlError::UnexpectedEof.into()),
                    }
                }
                let lower = lower.ok_or_else(|| DecodeError::MissingElement {
                    element: "lowerCorner".to_string(),
                    parent: name.clone(),
                })?;
                let upper = upper.ok_or_else(|| DecodeError::MissingElement {
                    element: "upperCorner".to_string(),
                    parent: name.clone(),
                })?;
                Ok(Envelope {
                    min_x: lower.x,
                    min_y: lower.y,
                    max_x: upper.x,
                    max_y: upper.y,
                    srs_name,
                })
            }
            _ => {
                // gml:Box carries both corners in one coordinates list.
                cursor.next_tag()?;
                let corners = match cursor.token() {
                    Token::Start(child) if child.local == "coordinates" => {
                        let child = child.clone();
                        let text = element_text(cursor)?;
                        parse_coordinates(&text, &child)?
                    }
                    _ => {
                        return Err(DecodeError::MissingElement {
                            element: "coordinates".to_string(),
                            parent: name.clone(),
                        });
                    }
                };
                let [lower, upper] = corners.as_slice() else {
                    return Err(DecodeError::InvalidNumber {
                        text: format!("{} corners", corners.len()),
                        element: name.clone(),
                    });
                };
                let envelope = Envelope {
                    min_x: lower.x,
                    min_y: lower.y,
                    max_x: upper.x,
                    max_y: upper.y,
                    srs_name,
                };
                cursor.next_tag()?;
                Ok(envelope)
            }
        }
    }
}

/// Decodes the GML geometry subset used as spatial operands and entry
/// georeferencing: Point, LineString, and Polygon.
pub struct GeometryDecoder {
    names: Vec<QName>,
}

impl GeometryDecoder {
    pub fn new() -> Self {
        Self {
            names: vec![gml("Point"), gml("LineString"), gml("Polygon")],
        }
    }
}

impl Default for GeometryDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementDecoder for GeometryDecoder {
    type Output = Geometry;

    fn names(&self) -> &[QName] {
        &self.names
    }

    fn decode_body(&self, cursor: &mut XmlCursor, name: &QName) -> Result<Geometry, DecodeError> {
        let srs_name = cursor.attribute("srsName").map(str::to_owned);
        match name.local.as_str() {
            "Point" => {
                cursor.next_tag()?;
                let coord = match cursor.token() {
                    Token::Start(child) => {
                        let child = child.clone();
                        let text = element_text(cursor)?;
                        match child.local.as_str() {
                            "pos" => parse_pos(&text, &child)?,
                            "coordinates" => {
                                let coords = parse_coordinates(&text, &child)?;
                                let [coord] = coords.as_slice() else {
                                    return Err(DecodeError::InvalidNumber {
                                        text,
                                        element: child,
                                    });
                                };
                                *coord
                            }
                            _ => {
                                return Err(DecodeError::UnexpectedElement {
                                    found: child,
                                    expected: "pos or coordinates".to_string(),
                                });
                            }
                        }
                    }
                    _ => {
                        return Err(DecodeError::MissingElement {
                            element: "pos".to_string(),
                            parent: name.clone(),
                        });
                    }
                };
                cursor.next_tag()?;
                Ok(Geometry::Point { coord, srs_name })
            }
            "LineString" => {
                cursor.next_tag()?;
                let coords = match cursor.token() {
                    Token::Start(child) => {
                        let child = child.clone();
                        let text = element_text(cursor)?;
                        match child.local.as_str() {
                            "posList" => parse_pos_list(&text, &child)?,
                            "coordinates" => parse_coordinates(&text, &child)?,
                            _ => {
                                return Err(DecodeError::UnexpectedElement {
                                    found: child,
                                    expected: "posList or coordinates".to_string(),
                                });
                            }
                        }
                    }
                    _ => {
                        return Err(DecodeError::MissingElement {
                            element: "posList".to_string(),
                            parent: name.clone(),
                        });
                    }
                };
                cursor.next_tag()?;
                Ok(Geometry::LineString { coords, srs_name })
            }
            _ => {
                let mut exterior: Option<Vec<Coord>> = None;
                let mut interiors: Vec<Vec<Coord>> = Vec::new();
                loop {
                    cursor.next_tag()?;
                    match cursor.token() {
                        Token::Start(child) => {
                            let child = child.clone();
                            match child.local.as_str() {
                                "exterior" | "outerBoundaryIs" => {
                                    exterior = Some(decode_ring(cursor, &child)?);
                                }
                                "interior" | "innerBoundaryIs" => {
                                    interiors.push(decode_ring(cursor, &child)?);
                                }
                                _ => {
                                    return Err(DecodeError::UnexpectedElement {
                                        found: child,
                                        expected: "exterior or interior".to_string(),
                                    });
                                }
                            }
                        }
                        Token::End(_) => break,
                        _ => return Err(geosync_bxml::BxmlError::UnexpectedEof.into()),
                    }
                }
                let exterior = exterior.ok_or_else(|| DecodeError::MissingElement {
                    element: "exterior".to_string(),
                    parent: name.clone(),
                })?;
                Ok(Geometry::Polygon {
                    exterior,
                    interiors,
                    srs_name,
                })
            }
        }
    }
}

/// Decodes a ring container (`exterior`/`interior` or the GML 2 boundary
/// forms): one nested `LinearRing` holding a position list. Leaves the
/// cursor at the container's end tag.
fn decode_ring(cursor: &mut XmlCursor, container: &QName) -> Result<Vec<Coord>, DecodeError> {
    cursor.next_tag()?;
    let ring = match cursor.token() {
        Token::Start(child) if child.local == "LinearRing" => child.clone(),
        other => {
            return Err(DecodeError::UnexpectedElement {
                found: other.name().cloned().unwrap_or_else(|| container.clone()),
                expected: "LinearRing".to_string(),
            });
        }
    };
    cursor.next_tag()?;
    let coords = match cursor.token() {
        Token::Start(child) => {
            let child = child.clone();
            let text = element_text(cursor)?;
            match child.local.as_str() {
                "posList" => parse_pos_list(&text, &child)?,
                "coordinates" => parse_coordinates(&text, &child)?,
                _ => {
                    return Err(DecodeError::UnexpectedElement {
                        found: child,
                        expected: "posList or coordinates".to_string(),
                    });
                }
            }
        }
        _ => {
            return Err(DecodeError::MissingElement {
                element: "posList".to_string(),
                parent: ring,
            });
        }
    };
    cursor.next_tag()?;
    cursor.require_end(&ring)?;
    cursor.next_tag()?;
    cursor.require_end(container)?;
    Ok(coords)
}

fn element_text(cursor: &mut XmlCursor) -> Result<String, DecodeError> {
    Ok(text_content(cursor)?.unwrap_or_default())
}

fn parse_f64(value: &str, element: &QName) -> Result<f64, DecodeError> {
    value
        .parse::<f64>()
        .map_err(|_| DecodeError::InvalidNumber {
            text: value.to_string(),
            element: element.clone(),
        })
}

/// Parses a `gml:pos`: exactly two whitespace-separated ordinates.
fn parse_pos(text: &str, element: &QName) -> Result<Coord, DecodeError> {
    let values: Vec<&str> = text.split_whitespace().collect();
    let [x, y] = values.as_slice() else {
        return Err(DecodeError::InvalidNumber {
            text: text.to_string(),
            element: element.clone(),
        });
    };
    Ok(Coord::new(parse_f64(x, element)?, parse_f64(y, element)?))
}

/// Parses a `gml:posList`: an even number of whitespace-separated ordinates.
fn parse_pos_list(text: &str, element: &QName) -> Result<Vec<Coord>, DecodeError> {
    let values: Vec<&str> = text.split_whitespace().collect();
    if values.len() % 2 != 0 {
        return Err(DecodeError::InvalidNumber {
            text: text.to_string(),
            element: element.clone(),
        });
    }
    values
        .chunks(2)
        .map(|pair| {
            Ok(Coord::new(
                parse_f64(pair[0], element)?,
                parse_f64(pair[1], element)?,
            ))
        })
        .collect()
}

/// Parses GML 2 `coordinates` with the default separators: tuples split by
/// whitespace, ordinates within a tuple by comma.
fn parse_coordinates(text: &str, element: &QName) -> Result<Vec<Coord>, DecodeError> {
    text.split_whitespace()
        .map(|tuple| {
            let Some((x, y)) = tuple.split_once(',') else {
                return Err(DecodeError::InvalidNumber {
                    text: tuple.to_string(),
                    element: element.clone(),
                });
            };
            Ok(Coord::new(parse_f64(x, element)?, parse_f64(y, element)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geosync_decode::Decoder;

    const GML_ATTR: &str = r#"xmlns:gml="http://www.opengis.net/gml""#;

    fn decode_envelope(inner: &str) -> Result<Envelope, DecodeError> {
        let source = format!("<root {GML_ATTR}>{inner}</root>");
        let mut cursor = XmlCursor::from_str(&source).unwrap();
        cursor.next_tag().unwrap();
        EnvelopeDecoder::new().decode(&mut cursor)
    }

    fn decode_geometry(inner: &str) -> Result<Geometry, DecodeError> {
        let source = format!("<root {GML_ATTR}>{inner}</root>");
        let mut cursor = XmlCursor::from_str(&source).unwrap();
        cursor.next_tag().unwrap();
        GeometryDecoder::new().decode(&mut cursor)
    }

    #[test]
    fn test_envelope_with_corners() {
        let envelope = decode_envelope(
            r#"<gml:Envelope srsName="urn:ogc:def:crs:EPSG::4326"><gml:lowerCorner>-10 -20</gml:lowerCorner><gml:upperCorner>10 20</gml:upperCorner></gml:Envelope>"#,
        )
        .unwrap();
        assert_eq!(envelope.min_x, -10.0);
        assert_eq!(envelope.min_y, -20.0);
        assert_eq!(envelope.max_x, 10.0);
        assert_eq!(envelope.max_y, 20.0);
        assert_eq!(
            envelope.srs_name.as_deref(),
            Some("urn:ogc:def:crs:EPSG::4326")
        );
    }

    #[test]
    fn test_gml2_box() {
        let envelope = decode_envelope(
            r#"<gml:Box srsName="EPSG:4326"><gml:coordinates>-1,-2 3,4</gml:coordinates></gml:Box>"#,
        )
        .unwrap();
        assert_eq!(envelope.min_x, -1.0);
        assert_eq!(envelope.max_y, 4.0);
    }

    #[test]
    fn test_envelope_missing_corner() {
        let err = decode_envelope(
            "<gml:Envelope><gml:lowerCorner>0 0</gml:lowerCorner></gml:Envelope>",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MissingElement { element, .. } if element == "upperCorner"
        ));
    }

    #[test]
    fn test_point_from_pos() {
        let geometry =
            decode_geometry("<gml:Point><gml:pos>12.5 -3.25</gml:pos></gml:Point>").unwrap();
        assert_eq!(
            geometry,
            Geometry::Point {
                coord: Coord::new(12.5, -3.25),
                srs_name: None,
            }
        );
    }

    #[test]
    fn test_line_string_from_pos_list() {
        let geometry = decode_geometry(
            "<gml:LineString><gml:posList>0 0 1 1 2 4</gml:posList></gml:LineString>",
        )
        .unwrap();
        match geometry {
            Geometry::LineString { coords, .. } => {
                assert_eq!(coords, vec![
                    Coord::new(0.0, 0.0),
                    Coord::new(1.0, 1.0),
                    Coord::new(2.0, 4.0),
                ]);
            }
            other => panic!("expected line string, got {:?}", other),
        }
    }

    #[test]
    fn test_odd_pos_list_fails() {
        let err = decode_geometry(
            "<gml:LineString><gml:posList>0 0 1</gml:posList></gml:LineString>",
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::InvalidNumber { .. }));
    }

    #[test]
    fn test_polygon_with_interior_ring() {
        let geometry = decode_geometry(
            "<gml:Polygon>\
               <gml:exterior><gml:LinearRing><gml:posList>0 0 10 0 10 10 0 10 0 0</gml:posList></gml:LinearRing></gml:exterior>\
               <gml:interior><gml:LinearRing><gml:posList>4 4 6 4 6 6 4 6 4 4</gml:posList></gml:LinearRing></gml:interior>\
             </gml:Polygon>",
        )
        .unwrap();
        match geometry {
            Geometry::Polygon {
                exterior,
                interiors,
                ..
            } => {
                assert_eq!(exterior.len(), 5);
                assert_eq!(interiors.len(), 1);
                assert_eq!(interiors[0].len(), 5);
            }
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_ordinate_fails() {
        let err =
            decode_geometry("<gml:Point><gml:pos>north south</gml:pos></gml:Point>").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidNumber { .. }));
    }
}
