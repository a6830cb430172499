use serde_json::{Map, Value};

use super::coordinate::Coordinate;

/// Zoom level at or below which the map does not report airspace features.
pub const MIN_AIRSPACE_ZOOM: f64 = 13.5;

/// Style layers carrying airspace data share this id prefix.
pub const AIRSPACE_LAYER_PREFIX: &str = "airmap";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationType {
    Fence,
    Advisory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirspaceCategory {
    Airport,
    Heliport,
    ControlledAirspace,
    SpecialUse,
    Tfr,
    Wildfire,
    Emergency,
    Park,
    PowerPlant,
    Prison,
    School,
    Hospital,
    University,
    City,
    Notam,
}

impl AirspaceCategory {
    pub fn as_str(&self) -> &str {
        match self {
            AirspaceCategory::Airport => "airport",
            AirspaceCategory::Heliport => "heliport",
            AirspaceCategory::ControlledAirspace => "controlled_airspace",
            AirspaceCategory::SpecialUse => "special_use_airspace",
            AirspaceCategory::Tfr => "tfr",
            AirspaceCategory::Wildfire => "wildfire",
            AirspaceCategory::Emergency => "emergency",
            AirspaceCategory::Park => "park",
            AirspaceCategory::PowerPlant => "power_plant",
            AirspaceCategory::Prison => "prison",
            AirspaceCategory::School => "school",
            AirspaceCategory::Hospital => "hospital",
            AirspaceCategory::University => "university",
            AirspaceCategory::City => "city",
            AirspaceCategory::Notam => "notam",
        }
    }

    /// Returns `None` for categories this demo does not know about.
    pub fn parse(category: &str) -> Option<AirspaceCategory> {
        let category = match category {
            "airport" => AirspaceCategory::Airport,
            "heliport" => AirspaceCategory::Heliport,
            "controlled_airspace" => AirspaceCategory::ControlledAirspace,
            "special_use_airspace" => AirspaceCategory::SpecialUse,
            "tfr" => AirspaceCategory::Tfr,
            "wildfire" => AirspaceCategory::Wildfire,
            "emergency" => AirspaceCategory::Emergency,
            "park" => AirspaceCategory::Park,
            "power_plant" => AirspaceCategory::PowerPlant,
            "prison" => AirspaceCategory::Prison,
            "school" => AirspaceCategory::School,
            "hospital" => AirspaceCategory::Hospital,
            "university" => AirspaceCategory::University,
            "city" => AirspaceCategory::City,
            "notam" => AirspaceCategory::Notam,
            _ => return None,
        };
        Some(category)
    }
}

/// An airspace as handed to the geofence evaluator: a GeoJSON geometry plus
/// the attributes the map attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct AirspaceObject {
    pub geometry: Value,
    pub attributes: Map<String, Value>,
    pub evaluation_type: EvaluationType,
}

impl AirspaceObject {
    pub fn new(geometry: Value, attributes: Map<String, Value>, evaluation_type: EvaluationType) -> Self {
        AirspaceObject {
            geometry,
            attributes,
            evaluation_type,
        }
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.attribute("name")
    }

    pub fn restriction(&self) -> Option<&str> {
        self.attribute("restriction_type")
    }

    pub fn category(&self) -> Option<AirspaceCategory> {
        AirspaceCategory::parse(self.attribute("category").unwrap_or(""))
    }
}

/// Supplies the airspaces relevant to a set of coordinates.
pub trait AirspaceSource {
    fn airspaces(&self, coordinates: &[Coordinate]) -> Vec<AirspaceObject>;
}

/// A rendered feature as reported by the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFeature {
    pub geometry: Option<Value>,
    pub attributes: Map<String, Value>,
}

/// The parts of a map renderer the airspace source needs.
pub trait MapView {
    fn zoom_level(&self) -> f64;

    /// Ids of the layers in the current style, or `None` while no style is loaded.
    fn style_layers(&self) -> Option<Vec<String>>;

    /// Features currently on screen that belong to any of `layers`.
    fn visible_features(&self, layers: &[String]) -> Vec<MapFeature>;
}

/// Reads airspaces off whatever the map is currently showing.
pub struct MapAirspaceSource<V: MapView> {
    map: V,
}

impl<V: MapView> MapAirspaceSource<V> {
    pub fn new(map: V) -> Self {
        MapAirspaceSource { map }
    }

    pub fn map(&self) -> &V {
        &self.map
    }
}

impl<V: MapView> AirspaceSource for MapAirspaceSource<V> {
    fn airspaces(&self, _coordinates: &[Coordinate]) -> Vec<AirspaceObject> {
        if self.map.zoom_level() <= MIN_AIRSPACE_ZOOM {
            return Vec::new();
        }

        let Some(layers) = self.map.style_layers() else {
            return Vec::new();
        };
        let layers: Vec<String> = layers
            .into_iter()
            .filter(|id| id.starts_with(AIRSPACE_LAYER_PREFIX))
            .collect();

        self.map
            .visible_features(&layers)
            .into_iter()
            .filter_map(|feature| {
                let geometry = feature.geometry?;
                Some(AirspaceObject::new(
                    geometry,
                    feature.attributes,
                    EvaluationType::Fence,
                ))
            })
            .collect()
    }
}
