/// Level-1 headers accepted as categories. A header that does not match one
/// of these exactly is dropped together with every rule beneath it.
pub const KNOWN_CATEGORIES: &[&str] = &[
    "CARDIOVASCULAR",
    "PULMONARY",
    "NEUROLOGICAL",
    "TRAUMA",
    "GASTROINTESTINAL",
    "INFECTIOUS DISEASE",
    "RENAL AND GENITOURINARY",
    "HEMATOLOGY AND ONCOLOGY",
    "ENDOCRINE AND METABOLIC",
    "TOXICOLOGY",
    "PEDIATRICS",
    "OBSTETRICS AND GYNECOLOGY",
    "PSYCHIATRY",
    "MUSCULOSKELETAL",
    "CRITICAL CARE",
];
