//! Decoders for the spatial predicates: BBOX, the eight binary spatial
//! operators, and the two distance-buffered operators.

use crate::gml::{EnvelopeDecoder, GeometryDecoder};
use crate::{crs, ogc};
use geosync_bxml::XmlCursor;
use geosync_decode::{text_content, Choice, DecodeError, Decoder, ElementDecoder};
use geosync_types::{
    Distance, DistanceOp, Expression, QName, SpatialFilter, SpatialOp, SpatialOperand,
};

use crate::expression::ExpressionDecoder;

/// Decodes `ogc:BBOX`: a property reference followed by an envelope. The
/// envelope's reference system is resolved to an EPSG code when possible;
/// an unresolvable reference system is logged and dropped, never fatal.
pub struct BBoxDecoder {
    names: Vec<QName>,
}

impl BBoxDecoder {
    pub fn new() -> Self {
        Self {
            names: vec![ogc("BBOX")],
        }
    }
}

impl Default for BBoxDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementDecoder for BBoxDecoder {
    type Output = SpatialFilter;

    fn names(&self) -> &[QName] {
        &self.names
    }

    fn decode_body(
        &self,
        cursor: &mut XmlCursor,
        name: &QName,
    ) -> Result<SpatialFilter, DecodeError> {
        cursor.next_tag()?;
        let Expression::Property(property) = ExpressionDecoder::new().decode(cursor)? else {
            return Err(DecodeError::ExpectedProperty(name.clone()));
        };
        cursor.next_tag()?;
        let envelope = EnvelopeDecoder::new().decode(cursor)?;
        let crs = match envelope.srs_name.as_deref() {
            Some(srs) => match crs::lookup_code(srs) {
                Ok(code) => Some(code),
                Err(err) => {
                    log::warn!("ignoring unresolvable reference system in BBOX: {err}");
                    None
                }
            },
            None => None,
        };
        cursor.next_tag()?;
        Ok(SpatialFilter::BBox {
            property,
            min_x: envelope.min_x,
            min_y: envelope.min_y,
            max_x: envelope.max_x,
            max_y: envelope.max_y,
            crs,
        })
    }
}

struct GeometryOperandDecoder {
    inner: GeometryDecoder,
}

impl Decoder for GeometryOperandDecoder {
    type Output = SpatialOperand;

    fn accepted_names(&self) -> &[QName] {
        self.inner.accepted_names()
    }

    fn decode(&self, cursor: &mut XmlCursor) -> Result<SpatialOperand, DecodeError> {
        Ok(SpatialOperand::Geometry(self.inner.decode(cursor)?))
    }
}

struct EnvelopeOperandDecoder {
    inner: EnvelopeDecoder,
}

impl Decoder for EnvelopeOperandDecoder {
    type Output = SpatialOperand;

    fn accepted_names(&self) -> &[QName] {
        self.inner.accepted_names()
    }

    fn decode(&self, cursor: &mut XmlCursor) -> Result<SpatialOperand, DecodeError> {
        Ok(SpatialOperand::Envelope(self.inner.decode(cursor)?))
    }
}

/// Decodes the eight binary spatial operators. Each takes an expression
/// (in practice a property reference) followed by a geometry or envelope
/// operand.
pub struct BinarySpatialDecoder {
    names: Vec<QName>,
    operands: Choice<SpatialOperand>,
}

impl BinarySpatialDecoder {
    pub fn new() -> Self {
        let names = [
            "Equals",
            "Disjoint",
            "Touches",
            "Within",
            "Overlaps",
            "Intersects",
            "Crosses",
            "Contains",
        ]
        .iter()
        .map(|n| ogc(n))
        .collect();
        let operands = Choice::new()
            .option(GeometryOperandDecoder {
                inner: GeometryDecoder::new(),
            })
            .option(EnvelopeOperandDecoder {
                inner: EnvelopeDecoder::new(),
            });
        Self { names, operands }
    }
}

impl Default for BinarySpatialDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementDecoder for BinarySpatialDecoder {
    type Output = SpatialFilter;

    fn names(&self) -> &[QName] {
        &self.names
    }

    fn decode_body(
        &self,
        cursor: &mut XmlCursor,
        name: &QName,
    ) -> Result<SpatialFilter, DecodeError> {
        let op = match name.local.as_str() {
            "Equals" => SpatialOp::Equals,
            "Disjoint" => SpatialOp::Disjoint,
            "Touches" => SpatialOp::Touches,
            "Within" => SpatialOp::Within,
            "Overlaps" => SpatialOp::Overlaps,
            "Intersects" => SpatialOp::Intersects,
            "Crosses" => SpatialOp::Crosses,
            "Contains" => SpatialOp::Contains,
            _ => return Err(DecodeError::UnsupportedOperator(name.clone())),
        };
        cursor.next_tag()?;
        let left = ExpressionDecoder::new().decode(cursor)?;
        cursor.next_tag()?;
        let right = self.operands.decode(cursor)?;
        cursor.next_tag()?;
        Ok(SpatialFilter::Binary { op, left, right })
    }
}

/// Decodes `ogc:Distance`: a numeric magnitude with an optional `units`
/// attribute.
pub struct DistanceDecoder {
    names: Vec<QName>,
}

impl DistanceDecoder {
    pub fn new() -> Self {
        Self {
            names: vec![ogc("Distance")],
        }
    }
}

impl Default for DistanceDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementDecoder for DistanceDecoder {
    type Output = Distance;

    fn names(&self) -> &[QName] {
        &self.names
    }

    fn decode_body(&self, cursor: &mut XmlCursor, name: &QName) -> Result<Distance, DecodeError> {
        let units = cursor.attribute("units").map(str::to_owned);
        let text = text_content(cursor)?.unwrap_or_default();
        let value = text
            .trim()
            .parse::<f64>()
            .map_err(|_| DecodeError::InvalidNumber {
                text,
                element: name.clone(),
            })?;
        Ok(Distance { value, units })
    }
}

/// Decodes `ogc:DWithin` and `ogc:Beyond`: an expression, a geometry, and
/// a distance, in document order.
pub struct DistanceBufferDecoder {
    names: Vec<QName>,
}

impl DistanceBufferDecoder {
    pub fn new() -> Self {
        Self {
            names: vec![ogc("DWithin"), ogc("Beyond")],
        }
    }
}

impl Default for DistanceBufferDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementDecoder for DistanceBufferDecoder {
    type Output = SpatialFilter;

    fn names(&self) -> &[QName] {
        &self.names
    }

    fn decode_body(
        &self,
        cursor: &mut XmlCursor,
        name: &QName,
    ) -> Result<SpatialFilter, DecodeError> {
        let op = match name.local.as_str() {
            "DWithin" => DistanceOp::DWithin,
            "Beyond" => DistanceOp::Beyond,
            _ => return Err(DecodeError::UnsupportedOperator(name.clone())),
        };
        cursor.next_tag()?;
        let left = ExpressionDecoder::new().decode(cursor)?;
        cursor.next_tag()?;
        let geometry = GeometryDecoder::new().decode(cursor)?;
        cursor.next_tag()?;
        let distance = DistanceDecoder::new().decode(cursor)?;
        cursor.next_tag()?;
        Ok(SpatialFilter::DistanceBuffer {
            op,
            left,
            geometry,
            distance: distance.value,
            units: distance.units,
        })
    }
}

/// The predicate dispatcher: a choice over BBOX, the binary spatial
/// operators, and the distance-buffered operators.
pub struct SpatialFilterDecoder {
    choice: Choice<SpatialFilter>,
}

impl SpatialFilterDecoder {
    pub fn new() -> Self {
        let choice = Choice::new()
            .option(BBoxDecoder::new())
            .option(BinarySpatialDecoder::new())
            .option(DistanceBufferDecoder::new());
        Self { choice }
    }
}

impl Default for SpatialFilterDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for SpatialFilterDecoder {
    type Output = SpatialFilter;

    fn accepted_names(&self) -> &[QName] {
        self.choice.accepted_names()
    }

    fn accepts(&self, name: &QName) -> bool {
        self.choice.accepts(name)
    }

    fn decode(&self, cursor: &mut XmlCursor) -> Result<SpatialFilter, DecodeError> {
        self.choice.decode(cursor)
    }
}

/// Decodes an `ogc:Filter` wrapper holding exactly one spatial predicate.
pub struct FilterDecoder {
    names: Vec<QName>,
}

impl FilterDecoder {
    pub fn new() -> Self {
        Self {
            names: vec![ogc("Filter")],
        }
    }
}

impl Default for FilterDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementDecoder for FilterDecoder {
    type Output = SpatialFilter;

    fn names(&self) -> &[QName] {
        &self.names
    }

    fn decode_body(
        &self,
        cursor: &mut XmlCursor,
        _name: &QName,
    ) -> Result<SpatialFilter, DecodeError> {
        cursor.next_tag()?;
        let predicate = SpatialFilterDecoder::new().decode(cursor)?;
        cursor.next_tag()?;
        Ok(predicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geosync_bxml::Token;
    use geosync_types::{Coord, Geometry};

    const NS_ATTRS: &str = r#"xmlns:ogc="http://www.opengis.net/ogc" xmlns:gml="http://www.opengis.net/gml""#;

    fn decode_filter(inner: &str) -> Result<SpatialFilter, DecodeError> {
        let source = format!("<root {NS_ATTRS}>{inner}</root>");
        let mut cursor = XmlCursor::from_str(&source).unwrap();
        cursor.next_tag().unwrap();
        SpatialFilterDecoder::new().decode(&mut cursor)
    }

    fn bbox(srs_attr: &str) -> String {
        format!(
            "<ogc:BBOX><ogc:PropertyName>geom</ogc:PropertyName>\
             <gml:Envelope{srs_attr}><gml:lowerCorner>0 0</gml:lowerCorner><gml:upperCorner>1 1</gml:upperCorner></gml:Envelope>\
             </ogc:BBOX>"
        )
    }

    #[test]
    fn test_bbox_resolves_epsg_code() {
        let filter = decode_filter(&bbox(r#" srsName="urn:ogc:def:crs:EPSG::4326""#)).unwrap();
        match filter {
            SpatialFilter::BBox {
                property,
                min_x,
                max_y,
                crs,
                ..
            } => {
                assert_eq!(property, "geom");
                assert_eq!(min_x, 0.0);
                assert_eq!(max_y, 1.0);
                assert_eq!(crs.as_deref(), Some("EPSG:4326"));
            }
            other => panic!("expected bbox, got {:?}", other),
        }
    }

    #[test]
    fn test_bbox_tolerates_unknown_reference_system() {
        let filter = decode_filter(&bbox(r#" srsName="urn:x-unknown:nowhere""#)).unwrap();
        match filter {
            SpatialFilter::BBox { crs, .. } => assert_eq!(crs, None),
            other => panic!("expected bbox, got {:?}", other),
        }
    }

    #[test]
    fn test_bbox_without_srs_has_no_crs() {
        let filter = decode_filter(&bbox("")).unwrap();
        match filter {
            SpatialFilter::BBox { crs, .. } => assert_eq!(crs, None),
            other => panic!("expected bbox, got {:?}", other),
        }
    }

    #[test]
    fn test_bbox_requires_property_reference() {
        let err = decode_filter(
            "<ogc:BBOX><ogc:Literal>geom</ogc:Literal>\
             <gml:Envelope><gml:lowerCorner>0 0</gml:lowerCorner><gml:upperCorner>1 1</gml:upperCorner></gml:Envelope>\
             </ogc:BBOX>",
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::ExpectedProperty(_)));
    }

    #[test]
    fn test_all_binary_operators() {
        let cases = [
            ("Equals", SpatialOp::Equals),
            ("Disjoint", SpatialOp::Disjoint),
            ("Touches", SpatialOp::Touches),
            ("Within", SpatialOp::Within),
            ("Overlaps", SpatialOp::Overlaps),
            ("Intersects", SpatialOp::Intersects),
            ("Crosses", SpatialOp::Crosses),
            ("Contains", SpatialOp::Contains),
        ];
        for (tag, expected) in cases {
            let filter = decode_filter(&format!(
                "<ogc:{tag}><ogc:PropertyName>geom</ogc:PropertyName>\
                 <gml:Point><gml:pos>1 2</gml:pos></gml:Point></ogc:{tag}>"
            ))
            .unwrap();
            match filter {
                SpatialFilter::Binary { op, left, right } => {
                    assert_eq!(op, expected, "operator {tag}");
                    assert_eq!(left, Expression::Property("geom".to_string()));
                    assert_eq!(
                        right,
                        SpatialOperand::Geometry(Geometry::Point {
                            coord: Coord::new(1.0, 2.0),
                            srs_name: None,
                        })
                    );
                }
                other => panic!("expected binary predicate for {tag}, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_binary_operator_with_envelope_operand() {
        let filter = decode_filter(
            "<ogc:Intersects><ogc:PropertyName>geom</ogc:PropertyName>\
             <gml:Envelope><gml:lowerCorner>0 0</gml:lowerCorner><gml:upperCorner>2 2</gml:upperCorner></gml:Envelope>\
             </ogc:Intersects>",
        )
        .unwrap();
        match filter {
            SpatialFilter::Binary {
                right: SpatialOperand::Envelope(envelope),
                ..
            } => assert_eq!(envelope.max_x, 2.0),
            other => panic!("expected envelope operand, got {:?}", other),
        }
    }

    #[test]
    fn test_dwithin_with_units() {
        let filter = decode_filter(
            r#"<ogc:DWithin><ogc:PropertyName>geom</ogc:PropertyName><gml:Point><gml:pos>5 5</gml:pos></gml:Point><ogc:Distance units="m">250.5</ogc:Distance></ogc:DWithin>"#,
        )
        .unwrap();
        match filter {
            SpatialFilter::DistanceBuffer {
                op,
                distance,
                units,
                ..
            } => {
                assert_eq!(op, DistanceOp::DWithin);
                assert_eq!(distance, 250.5);
                assert_eq!(units.as_deref(), Some("m"));
            }
            other => panic!("expected distance buffer, got {:?}", other),
        }
    }

    #[test]
    fn test_distance_without_units_is_tolerated() {
        let filter = decode_filter(
            "<ogc:DWithin><ogc:PropertyName>geom</ogc:PropertyName><gml:Point><gml:pos>5 5</gml:pos></gml:Point><ogc:Distance>12.5</ogc:Distance></ogc:DWithin>",
        )
        .unwrap();
        match filter {
            SpatialFilter::DistanceBuffer {
                distance, units, ..
            } => {
                assert_eq!(distance, 12.5);
                assert_eq!(units, None);
            }
            other => panic!("expected distance buffer, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_distance_fails() {
        let err = decode_filter(
            "<ogc:Beyond><ogc:PropertyName>geom</ogc:PropertyName><gml:Point><gml:pos>5 5</gml:pos></gml:Point><ogc:Distance>far</ogc:Distance></ogc:Beyond>",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::InvalidNumber { text, .. } if text == "far"
        ));
    }

    #[test]
    fn test_filter_wrapper_leaves_cursor_balanced() {
        let source = format!(
            "<root {NS_ATTRS}><ogc:Filter>{}</ogc:Filter></root>",
            bbox("")
        );
        let mut cursor = XmlCursor::from_str(&source).unwrap();
        cursor.next_tag().unwrap();
        let filter = FilterDecoder::new().decode(&mut cursor).unwrap();
        assert!(matches!(filter, SpatialFilter::BBox { .. }));
        match cursor.token() {
            Token::End(name) => assert_eq!(name.local, "Filter"),
            other => panic!("cursor not at end tag: {:?}", other),
        }
    }
}
