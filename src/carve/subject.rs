use crate::image::Rect;

use image::GrayImage;
use serde::{Deserialize, Serialize};

/// Subjects listed on the transcript, in table order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectName {
    Math,
    Physics,
    Chemistry,
    Biology,
    Informatics,
    Literature,
    History,
    Geography,
    English,
    CivicEducation,
    Technology,
    PhysicalEducation,
    DefenseEducation,
}

impl SubjectName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectName::Math => "math",
            SubjectName::Physics => "physics",
            SubjectName::Chemistry => "chemistry",
            SubjectName::Biology => "biology",
            SubjectName::Informatics => "informatics",
            SubjectName::Literature => "literature",
            SubjectName::History => "history",
            SubjectName::Geography => "geography",
            SubjectName::English => "english",
            SubjectName::CivicEducation => "civic_education",
            SubjectName::Technology => "technology",
            SubjectName::PhysicalEducation => "physical_education",
            SubjectName::DefenseEducation => "defense_education",
        }
    }
}

impl std::fmt::Display for SubjectName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

const NEW_FORM: [SubjectName; 13] = [
    SubjectName::Math,
    SubjectName::Physics,
    SubjectName::Chemistry,
    SubjectName::Biology,
    SubjectName::Informatics,
    SubjectName::Literature,
    SubjectName::History,
    SubjectName::Geography,
    SubjectName::English,
    SubjectName::CivicEducation,
    SubjectName::Technology,
    SubjectName::PhysicalEducation,
    SubjectName::DefenseEducation,
];

const OLD_FORM: [SubjectName; 12] = [
    SubjectName::Math,
    SubjectName::Physics,
    SubjectName::Chemistry,
    SubjectName::Biology,
    SubjectName::Informatics,
    SubjectName::Literature,
    SubjectName::History,
    SubjectName::Geography,
    SubjectName::English,
    SubjectName::Technology,
    SubjectName::DefenseEducation,
    SubjectName::PhysicalEducation,
];

/// Template revision of the transcript page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormVariant {
    Old,
    New,
}

impl FormVariant {
    /// Subject rows of this template, top to bottom.
    pub fn subjects(&self) -> &'static [SubjectName] {
        match self {
            FormVariant::Old => &OLD_FORM,
            FormVariant::New => &NEW_FORM,
        }
    }
}

/// One subject row: its three score cells and the score read from them.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub name: SubjectName,
    /// 1-based row below the table's first boundary.
    pub row: usize,
    /// Score placeholder, filled by recognition.
    pub score: f32,
    /// Semester 1, semester 2 and yearly cells in region coordinates.
    pub cells: [Rect; 3],
    #[serde(skip)]
    pub semester1: GrayImage,
    #[serde(skip)]
    pub semester2: GrayImage,
    #[serde(skip)]
    pub yearly: GrayImage,
}
