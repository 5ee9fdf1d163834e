//! In-memory backend shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use portal_dash::client::PortalApi;
use portal_dash::error::FetchError;
use portal_dash::models::*;

/// Canned outcome of one request.
#[derive(Clone)]
pub enum Reply<T> {
    Ok(T),
    /// Answer after a delay.
    Slow(u64, T),
    /// Well-formed JSON of the wrong shape.
    Shape,
    /// Connection or HTTP failure.
    Down,
    /// The client itself panics mid-request.
    Panic,
}

impl<T: Clone> Reply<T> {
    async fn resolve(&self) -> Result<T, FetchError> {
        match self {
            Reply::Ok(v) => Ok(v.clone()),
            Reply::Slow(ms, v) => {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
                Ok(v.clone())
            }
            Reply::Shape => Err(FetchError::UnexpectedShape("test".into())),
            Reply::Down => Err(FetchError::Network("connection refused".into())),
            Reply::Panic => panic!("client bug"),
        }
    }
}

#[derive(Clone)]
pub struct FakePortal {
    pub semesters: Reply<Vec<Semester>>,
    pub subjects: HashMap<u32, Reply<Vec<Subject>>>,
    pub documents: HashMap<i64, Reply<Vec<Document>>>,
    pub attendance: Reply<AttendanceOverview>,
    pub records: HashMap<i64, Reply<Vec<AttendanceRecord>>>,
}

pub fn semester(key: u32, name: &str) -> Semester {
    Semester {
        key,
        name: name.to_string(),
    }
}

pub fn subject(id: i64, name: &str) -> Subject {
    Subject {
        id,
        name: name.to_string(),
    }
}

pub fn doc(name: &str, kind: &str, view_id: i64) -> Document {
    Document {
        doc_name: Some(name.to_string()),
        kind: Some(kind.to_string()),
        view_id: Some(view_id),
        time: Some(1_696_767_300),
        ..Default::default()
    }
}

impl FakePortal {
    /// Two semesters; semester 2 has two subjects, course 101 has three
    /// documents and course 102 has none.
    pub fn sample() -> Self {
        let mut subjects = HashMap::new();
        subjects.insert(1, Reply::Ok(vec![subject(11, "Mathematics I")]));
        subjects.insert(
            2,
            Reply::Ok(vec![subject(101, "Networks"), subject(102, "Ethics")]),
        );

        let mut documents = HashMap::new();
        documents.insert(
            101,
            Reply::Ok(vec![
                doc("Lab Sheet 1.pdf", "resource", 5001),
                doc("Course portal", "url", 5002),
                doc("Weekly quiz", "quiz", 5003),
            ]),
        );
        documents.insert(102, Reply::Ok(Vec::new()));
        documents.insert(11, Reply::Ok(vec![doc("Limits.pptx", "resource", 7001)]));

        let mut records = HashMap::new();
        records.insert(
            7,
            Reply::Ok(vec![
                AttendanceRecord {
                    class_no: Some("1".into()),
                    date: Some("01-08-2025".into()),
                    time: Some("09:00".into()),
                    status: Some("Present".into()),
                },
                AttendanceRecord {
                    class_no: Some("2".into()),
                    date: Some("02-08-2025".into()),
                    time: Some("09:00".into()),
                    status: Some("Absent".into()),
                },
            ]),
        );

        Self {
            semesters: Reply::Ok(vec![semester(1, "Sem 1"), semester(2, "Sem 2")]),
            subjects,
            documents,
            attendance: Reply::Ok(AttendanceOverview {
                overall_percentage: Some(85.5),
                courses: vec![CourseAttendance {
                    subject: Some("Networks".into()),
                    total_classes: Some(20),
                    present: Some(18),
                    absent: Some(2),
                    percentage: Some(90.0),
                    altid: Some(7),
                }],
            }),
            records,
        }
    }
}

#[async_trait]
impl PortalApi for FakePortal {
    async fn semesters(&self) -> Result<Vec<Semester>, FetchError> {
        self.semesters.resolve().await
    }

    async fn subjects(&self, semester: u32) -> Result<Vec<Subject>, FetchError> {
        match self.subjects.get(&semester) {
            Some(reply) => reply.resolve().await,
            None => Ok(Vec::new()),
        }
    }

    async fn documents(&self, course_id: i64) -> Result<Vec<Document>, FetchError> {
        match self.documents.get(&course_id) {
            Some(reply) => reply.resolve().await,
            None => Ok(Vec::new()),
        }
    }

    async fn attendance(&self) -> Result<AttendanceOverview, FetchError> {
        self.attendance.resolve().await
    }

    async fn course_attendance(&self, altid: i64) -> Result<Vec<AttendanceRecord>, FetchError> {
        match self.records.get(&altid) {
            Some(reply) => reply.resolve().await,
            None => Ok(Vec::new()),
        }
    }
}
