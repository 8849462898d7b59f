use serde::Serialize;

use complaints_common::entities::{Location, Student};
use complaints_common::{LocationId, StudentId};

#[derive(Debug, Clone, Serialize)]
pub struct ManyStudentsResponse {
    pub data: Vec<StudentResponse>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponse {
    pub id: StudentId,
    pub student_number: String,
    pub first_name: String,
    pub last_name: String,
    pub grade: String,
    pub class: String,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            student_number: student.student_number.to_string(),
            first_name: student.first_name,
            last_name: student.last_name,
            grade: student.grade,
            class: student.class_name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ManyLocationsResponse {
    pub data: Vec<LocationResponse>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub id: LocationId,
    pub name: String,
    pub description: Option<String>,
}

impl From<Location> for LocationResponse {
    fn from(location: Location) -> Self {
        Self {
            id: location.id,
            name: location.name.to_string(),
            description: location.description,
        }
    }
}
