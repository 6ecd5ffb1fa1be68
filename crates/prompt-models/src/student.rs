//! Student, person and team types shared across phase modules.

use prompt_core::serde::empty_string_as_none;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Gender options collected on the student profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Diverse,
    PreferNotToSay,
    #[serde(other)]
    Other,
}

/// Degree level a student is enrolled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyDegree {
    Bachelor,
    Master,
    #[serde(other)]
    Other,
}

/// Student profile as stored by the core service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Student {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub matriculation_number: String,
    pub university_login: String,
    pub has_university_account: bool,
    #[serde(deserialize_with = "empty_string_as_none")]
    pub gender: Option<Gender>,
    pub nationality: String,
    #[serde(deserialize_with = "empty_string_as_none")]
    pub study_degree: Option<StudyDegree>,
    pub study_program: String,
    pub current_semester: Option<i32>,
}

/// Minimal identification of a person (team member, tutor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

/// A group of students and tutors working together in a course phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub members: Vec<Person>,
    #[serde(default)]
    pub tutors: Vec<Person>,
}
