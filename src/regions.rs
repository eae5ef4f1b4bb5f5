//! Regional reference data for culturally grounded analogies.
//!
//! The built-in table covers three buckets. A TOML config may replace individual
//! profiles at start-up; after that the table is read-only.

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CulturalBucket {
  #[default]
  RuralIndia,
  UrbanIndia,
  TribalAreas,
}

const TRIBAL_MARKERS: [&str; 2] = ["tribal", "adivasi"];
const URBAN_MARKERS: [&str; 2] = ["urban", "city"];

impl CulturalBucket {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::RuralIndia => "rural_india",
      Self::UrbanIndia => "urban_india",
      Self::TribalAreas => "tribal_areas",
    }
  }

  pub fn parse(name: &str) -> Option<Self> {
    match name.trim() {
      "rural_india" => Some(Self::RuralIndia),
      "urban_india" => Some(Self::UrbanIndia),
      "tribal_areas" => Some(Self::TribalAreas),
      _ => None,
    }
  }

  /// Keyword containment over the lowercased cultural tag and region.
  /// Tribal markers are checked first, then urban; everything else is rural.
  pub fn classify(cultural_context: &str, region: &str) -> Self {
    let fields = [cultural_context.to_lowercase(), region.to_lowercase()];
    let mentions = |markers: &[&str]| fields.iter().any(|f| markers.iter().any(|m| f.contains(*m)));

    if mentions(&TRIBAL_MARKERS[..]) {
      Self::TribalAreas
    } else if mentions(&URBAN_MARKERS[..]) {
      Self::UrbanIndia
    } else {
      Self::default()
    }
  }
}

/// Locally familiar material the model can draw analogies from.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct RegionalProfile {
  pub common_concepts: Vec<String>,
  pub occupations: Vec<String>,
  pub festivals: Vec<String>,
  pub food: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
  items.iter().map(|s| s.to_string()).collect()
}

/// Built-in profile for a bucket.
pub fn builtin_profile(bucket: CulturalBucket) -> RegionalProfile {
  match bucket {
    CulturalBucket::RuralIndia => RegionalProfile {
      common_concepts: strings(&["farming", "village market", "bullock cart", "monsoon", "harvest", "cattle", "well", "temple"]),
      occupations: strings(&["farmer", "shopkeeper", "teacher", "blacksmith", "weaver"]),
      festivals: strings(&["Diwali", "Holi", "harvest festival"]),
      food: strings(&["rice", "wheat", "dal", "curry", "chapati"]),
    },
    CulturalBucket::UrbanIndia => RegionalProfile {
      common_concepts: strings(&["traffic", "metro", "mall", "apartment", "office", "smartphone", "internet"]),
      occupations: strings(&["engineer", "doctor", "business person", "teacher", "driver"]),
      festivals: strings(&["Diwali", "Christmas", "New Year"]),
      food: strings(&["street food", "restaurant", "fast food", "traditional meals"]),
    },
    CulturalBucket::TribalAreas => RegionalProfile {
      common_concepts: strings(&["forest", "tribal dance", "traditional crafts", "nature", "community gathering"]),
      occupations: strings(&["hunter", "gatherer", "craft maker", "traditional healer"]),
      festivals: strings(&["harvest ceremonies", "tribal festivals"]),
      food: strings(&["forest produce", "traditional recipes", "wild vegetables"]),
    },
  }
}

/// Immutable bucket -> profile lookup.
#[derive(Clone, Debug)]
pub struct RegionTable {
  profiles: HashMap<CulturalBucket, RegionalProfile>,
}

impl Default for RegionTable {
  fn default() -> Self { Self::builtin() }
}

impl RegionTable {
  pub fn builtin() -> Self {
    let profiles = [CulturalBucket::RuralIndia, CulturalBucket::UrbanIndia, CulturalBucket::TribalAreas]
      .into_iter()
      .map(|b| (b, builtin_profile(b)))
      .collect();
    Self { profiles }
  }

  /// Built-in table with some profiles replaced.
  pub fn with_overrides(overrides: &HashMap<CulturalBucket, RegionalProfile>) -> Self {
    let mut table = Self::builtin();
    for (bucket, profile) in overrides {
      table.profiles.insert(*bucket, profile.clone());
    }
    table
  }

  /// Profile for a bucket, falling back to the default (rural) profile.
  pub fn get(&self, bucket: CulturalBucket) -> &RegionalProfile {
    self.profiles
      .get(&bucket)
      .or_else(|| self.profiles.get(&CulturalBucket::default()))
      .unwrap_or(&RURAL_FALLBACK)
  }

  /// Classify and look up in one step.
  pub fn lookup(&self, cultural_context: &str, region: &str) -> (CulturalBucket, &RegionalProfile) {
    let bucket = CulturalBucket::classify(cultural_context, region);
    (bucket, self.get(bucket))
  }
}

// Only reachable if a table was built without its rural entry, which `builtin`
// never does; an empty profile still renders a valid prompt.
static RURAL_FALLBACK: RegionalProfile = RegionalProfile {
  common_concepts: Vec::new(),
  occupations: Vec::new(),
  festivals: Vec::new(),
  food: Vec::new(),
};
