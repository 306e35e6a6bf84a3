//! Field type → profile value lookup.

use formpilot_protocols::{FieldType, Profile};

/// Dotted profile path a field type reads from.
pub fn profile_path(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::FirstName => "personalInfo.firstName",
        FieldType::LastName => "personalInfo.lastName",
        FieldType::Email => "personalInfo.email",
        FieldType::Phone => "personalInfo.phone",
        FieldType::Address => "personalInfo.address.street",
        FieldType::City => "personalInfo.address.city",
        FieldType::State => "personalInfo.address.state",
        FieldType::Postcode => "personalInfo.address.zipCode",
        FieldType::CoverLetter => "workInfo.experience",
        FieldType::ResumeText => "workInfo.skills",
    }
}

/// Value to write for a field type. Empty when the profile has nothing.
pub fn resolve_value(field_type: FieldType, profile: &Profile) -> String {
    let personal = &profile.personal_info;
    let address = &personal.address;
    let value = match field_type {
        FieldType::FirstName => personal.first_name.clone(),
        FieldType::LastName => personal.last_name.clone(),
        FieldType::Email => personal.email.clone(),
        FieldType::Phone => personal.phone.clone(),
        FieldType::Address => address.street.clone(),
        FieldType::City => address.city.clone(),
        FieldType::State => address.state.clone(),
        FieldType::Postcode => address.zip_code.clone(),
        FieldType::CoverLetter => profile.work_info.experience.clone(),
        FieldType::ResumeText => profile.work_info.skills.join(", "),
    };
    value.trim().to_string()
}
