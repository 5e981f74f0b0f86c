//! Plain-text certificate layout.

use crate::model::birth::BirthRecord;
use crate::model::death::DeathRecord;
use crate::model::record::Record;
use chrono::NaiveDate;
use std::fmt::{Display, Formatter};

const DATE_FORMAT: &str = "%d %B %Y";
const RULE_WIDTH: usize = 60;

/// Labelled block of certificate lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateSection {
    pub heading: &'static str,
    pub entries: Vec<(&'static str, String)>,
}

/// Render-ready certificate for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub title: &'static str,
    pub certificate_no: String,
    pub registration_date: NaiveDate,
    pub sections: Vec<CertificateSection>,
}

impl Display for Certificate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(f, "{rule}")?;
        writeln!(f, "{:^width$}", self.title, width = RULE_WIDTH)?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Certificate No: {}", self.certificate_no)?;
        writeln!(
            f,
            "Registration Date: {}",
            self.registration_date.format(DATE_FORMAT)
        )?;

        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "{}", section.heading)?;
            writeln!(f, "{}", "-".repeat(section.heading.len()))?;
            for (label, value) in &section.entries {
                writeln!(f, "{label:<24}{value}")?;
            }
        }

        writeln!(f)?;
        writeln!(f, "{:>width$}", "Registrar's Signature", width = RULE_WIDTH)
    }
}

/// Record kinds that can be certified.
pub trait Certify: Record {
    fn certificate(&self) -> Certificate;
}

impl Certify for BirthRecord {
    fn certificate(&self) -> Certificate {
        let fields = &self.fields;
        let kind = Self::KIND;
        let weight = if fields.birth_weight.trim().is_empty() {
            String::new()
        } else {
            format!("{} kg", fields.birth_weight.trim())
        };

        Certificate {
            title: "BIRTH CERTIFICATE",
            certificate_no: format!("{}-{}", kind.certificate_prefix(), self.id),
            registration_date: self.registration_date.date_naive(),
            sections: vec![
                CertificateSection {
                    heading: "CHILD INFORMATION",
                    entries: vec![
                        ("Name:", self.full_name()),
                        ("Gender:", humanize(&fields.gender)),
                        ("Date of Birth:", long_date(fields.date_of_birth)),
                        ("Time of Birth:", self.time_of_birth().unwrap_or_default()),
                        ("Place of Birth:", fields.place_of_birth.clone()),
                        ("Birth Weight:", weight),
                    ],
                },
                CertificateSection {
                    heading: "PARENT INFORMATION",
                    entries: vec![
                        ("Father's Name:", fields.father_name.clone()),
                        ("Mother's Name:", fields.mother_name.clone()),
                        ("Address:", fields.permanent_address.clone()),
                    ],
                },
                CertificateSection {
                    heading: "REGISTRATION DETAILS",
                    entries: vec![
                        (
                            "Registration No:",
                            format!("{}-{}", kind.registration_prefix(), self.id),
                        ),
                        ("Locality:", humanize(&fields.locality)),
                        ("Mode of Birth:", humanize(&fields.mode_of_birth)),
                        (
                            "Registration Date:",
                            long_date(Some(self.registration_date.date_naive())),
                        ),
                    ],
                },
            ],
        }
    }
}

impl Certify for DeathRecord {
    fn certificate(&self) -> Certificate {
        let fields = &self.fields;
        let kind = Self::KIND;

        Certificate {
            title: "DEATH CERTIFICATE",
            certificate_no: format!("{}-{}", kind.certificate_prefix(), self.id),
            registration_date: self.registration_date.date_naive(),
            sections: vec![
                CertificateSection {
                    heading: "DECEASED INFORMATION",
                    entries: vec![
                        ("Name:", self.full_name()),
                        ("Gender:", humanize(&fields.gender)),
                        ("Date of Birth:", long_date(fields.date_of_birth)),
                        ("Date of Death:", long_date(fields.date_of_death)),
                        ("Place of Death:", fields.place_of_death.clone()),
                        ("Cause of Death:", humanize(self.effective_cause_of_death())),
                        ("Permanent Address:", fields.permanent_address.clone()),
                    ],
                },
                CertificateSection {
                    heading: "IDENTIFICATION DETAILS",
                    entries: vec![
                        ("ID Proof Type:", humanize(&fields.id_proof_type)),
                        ("ID Proof Number:", fields.id_proof_number.clone()),
                    ],
                },
                CertificateSection {
                    heading: "INFORMANT DETAILS",
                    entries: vec![
                        ("Informant Name:", fields.informant_name.clone()),
                        ("Relation to Deceased:", fields.informant_relation.clone()),
                        ("Phone Number:", fields.informant_phone.clone()),
                        ("Address:", fields.informant_address.clone()),
                    ],
                },
                CertificateSection {
                    heading: "REGISTRATION DETAILS",
                    entries: vec![
                        (
                            "Registration No:",
                            format!("{}-{}", kind.registration_prefix(), self.id),
                        ),
                        (
                            "Registration Date:",
                            long_date(Some(self.registration_date.date_naive())),
                        ),
                    ],
                },
            ],
        }
    }
}

fn long_date(date: Option<NaiveDate>) -> String {
    date.map(|date| date.format(DATE_FORMAT).to_string()).unwrap_or_default()
}

/// `pending_investigation` -> `Pending Investigation`.
fn humanize(value: &str) -> String {
    value
        .trim()
        .split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::humanize;

    #[test]
    fn humanize_splits_and_capitalizes() {
        assert_eq!(humanize("pending_investigation"), "Pending Investigation");
        assert_eq!(humanize("voter_id"), "Voter Id");
        assert_eq!(humanize("female"), "Female");
        assert_eq!(humanize(""), "");
    }
}
