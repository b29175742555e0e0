// Demo data for local development: one admin, two students, a project
// with tasks. Enabled with SEED_DEMO_DATA=1.

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::AppResult;
use crate::graphql::encode_doc;
use crate::models::{collections, Admin, Project, Role, Status, Student, Task, User};
use crate::session::hash_password;
use crate::store::DocumentStore;

pub async fn seed_demo_data(store: &Arc<dyn DocumentStore>) -> AppResult<()> {
    if !store.list(collections::USERS).await?.is_empty() {
        info!("Store already has users, skipping demo seed");
        return Ok(());
    }

    let admin_user = User {
        id: Uuid::new_v4().to_string(),
        name: "Grace Hopper".to_string(),
        email: "grace@example.com".to_string(),
        password: hash_password("password")?,
        role: Role::Admin,
        created_at: Utc::now(),
    };
    store
        .insert(collections::USERS, &admin_user.id, &encode_doc(&admin_user)?)
        .await?;

    let admin = Admin {
        id: Uuid::new_v4().to_string(),
        user_id: admin_user.id.clone(),
        permissions: vec!["manage_projects".to_string(), "manage_users".to_string()],
    };
    store
        .insert(collections::ADMINS, &admin.id, &encode_doc(&admin)?)
        .await?;

    let student_specs = [
        ("Alice Johnson", "alice@example.com", "U1001", "Computer Science", 2),
        ("Bob Smith", "bob@example.com", "U1002", "Mathematics", 3),
    ];
    let mut student_ids = Vec::new();
    for (name, email, university_id, major, year) in student_specs {
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password: hash_password("password")?,
            role: Role::Student,
            created_at: Utc::now(),
        };
        store
            .insert(collections::USERS, &user.id, &encode_doc(&user)?)
            .await?;

        let student = Student {
            id: Uuid::new_v4().to_string(),
            user_id: user.id,
            university_id: university_id.to_string(),
            major: major.to_string(),
            year,
        };
        store
            .insert(collections::STUDENTS, &student.id, &encode_doc(&student)?)
            .await?;
        student_ids.push(student.id);
    }

    let task = Task {
        id: Uuid::new_v4().to_string(),
        title: "Collect requirements".to_string(),
        description: "Interview stakeholders and write up findings".to_string(),
        due_date: demo_date(2026, 9, 15),
        status: Status::Pending,
        project_id: String::new(), // patched below
        created_by: admin.id.clone(),
        students_working_on: vec![student_ids[0].clone()],
        created_at: Utc::now(),
    };

    let project = Project {
        id: Uuid::new_v4().to_string(),
        title: "Campus portal".to_string(),
        description: "Rebuild the student-facing portal".to_string(),
        start_date: demo_date(2026, 9, 1),
        end_date: demo_date(2026, 12, 20),
        status: Status::NotStarted,
        progress: 0,
        created_by: admin.id.clone(),
        students_working_on: student_ids,
        tasks: vec![task.id.clone()],
        created_at: Utc::now(),
    };
    store
        .insert(collections::PROJECTS, &project.id, &encode_doc(&project)?)
        .await?;

    let task = Task {
        project_id: project.id.clone(),
        ..task
    };
    store
        .insert(collections::TASKS, &task.id, &encode_doc(&task)?)
        .await?;

    info!("Seeded demo data: 3 users, 1 project, 1 task");
    Ok(())
}

fn demo_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}
