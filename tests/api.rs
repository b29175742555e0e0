// End-to-end GraphQL tests over an in-memory store.

use async_graphql::{Request, Variables};
use serde_json::{json, Value};
use std::sync::Arc;

use taskboard::config::{
    CacheConfig, Config, CorsConfig, DatabaseConfig, ServerConfig, SessionConfig,
};
use taskboard::graphql::{build_schema, AppContext, AppSchema};
use taskboard::models::Role;
use taskboard::session::{Session, SessionKeys};
use taskboard::store::{DocumentStore, SqliteStore};

fn test_config(auto_provision: bool) -> Config {
    Config {
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        session: SessionConfig {
            secret: "test-secret".to_string(),
            ttl_secs: 3600,
        },
        cors: CorsConfig {
            origins: vec!["*".to_string()],
        },
        cache: CacheConfig {
            capacity: 100,
            default_ttl_secs: 300,
        },
        auto_provision,
    }
}

async fn schema_with(auto_provision: bool) -> AppSchema {
    let store: Arc<dyn DocumentStore> = Arc::new(SqliteStore::in_memory().await.unwrap());
    let config = test_config(auto_provision);
    let keys = Arc::new(SessionKeys::new(
        &config.session.secret,
        config.session.ttl_secs,
    ));
    build_schema(AppContext { store, keys, config })
}

async fn exec(schema: &AppSchema, query: &str, vars: Value) -> async_graphql::Response {
    schema
        .execute(Request::new(query).variables(Variables::from_json(vars)))
        .await
}

async fn exec_as(
    schema: &AppSchema,
    query: &str,
    vars: Value,
    session: Session,
) -> async_graphql::Response {
    schema
        .execute(
            Request::new(query)
                .variables(Variables::from_json(vars))
                .data(session),
        )
        .await
}

/// Unwrap a successful response into JSON data.
fn data(resp: async_graphql::Response) -> Value {
    assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);
    resp.data.into_json().unwrap()
}

fn first_error_message(resp: &async_graphql::Response) -> String {
    resp.errors.first().expect("expected an error").message.clone()
}

fn first_error_code(resp: async_graphql::Response) -> String {
    let v = serde_json::to_value(resp).unwrap();
    v["errors"][0]["extensions"]["code"]
        .as_str()
        .expect("expected an error code")
        .to_string()
}

const ADD_USER: &str = "
mutation($input: NewUser!) {
  addUser(input: $input) { id name email role }
}";

async fn add_user(schema: &AppSchema, name: &str, email: &str, role: &str) -> String {
    let resp = exec(
        schema,
        ADD_USER,
        json!({"input": {"name": name, "email": email, "password": "p", "role": role}}),
    )
    .await;
    data(resp)["addUser"]["id"].as_str().unwrap().to_string()
}

async fn add_admin(schema: &AppSchema, user_id: &str) -> String {
    let resp = exec(
        schema,
        "mutation($input: NewAdmin!) { addAdmin(input: $input) { id } }",
        json!({"input": {"userId": user_id, "permissions": ["manage_projects"]}}),
    )
    .await;
    data(resp)["addAdmin"]["id"].as_str().unwrap().to_string()
}

async fn add_project(schema: &AppSchema, title: &str, admin_id: &str) -> String {
    let resp = exec(
        schema,
        "mutation($input: NewProject!) { addProject(input: $input) { id } }",
        json!({"input": {
            "title": title,
            "description": "d",
            "startDate": "2026-09-01",
            "endDate": "2026-12-20",
            "createdBy": admin_id,
        }}),
    )
    .await;
    data(resp)["addProject"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn add_user_then_get_one_returns_equal_fields() {
    let schema = schema_with(false).await;
    let id = add_user(&schema, "alice", "a@x.com", "STUDENT").await;

    let resp = exec(
        &schema,
        "query($id: String!) { user(id: $id) { id name email role } }",
        json!({"id": id}),
    )
    .await;
    let user = &data(resp)["user"];
    assert_eq!(user["name"], "alice");
    assert_eq!(user["email"], "a@x.com");
    assert_eq!(user["role"], "STUDENT");
}

#[tokio::test]
async fn duplicate_email_is_a_conflict_and_creates_no_record() {
    let schema = schema_with(false).await;
    add_user(&schema, "alice", "a@x.com", "STUDENT").await;

    let resp = exec(
        &schema,
        ADD_USER,
        json!({"input": {"name": "bob", "email": "a@x.com", "password": "p", "role": "STUDENT"}}),
    )
    .await;
    assert!(first_error_message(&resp).contains("already exists"));
    assert_eq!(first_error_code(resp), "CONFLICT");

    let resp = exec(&schema, "query { users { id } }", json!({})).await;
    assert_eq!(data(resp)["users"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn renaming_a_user_to_a_taken_name_is_a_conflict() {
    let schema = schema_with(false).await;
    add_user(&schema, "alice", "a@x.com", "STUDENT").await;
    let bob_id = add_user(&schema, "bob", "b@x.com", "STUDENT").await;

    let update = "mutation($id: String!, $input: UpdateUser!) {
        updateUser(id: $id, input: $input) { id name }
    }";

    let resp = exec(
        &schema,
        update,
        json!({"id": bob_id, "input": {"name": "alice"}}),
    )
    .await;
    assert!(first_error_message(&resp).contains("already exists"));
    assert_eq!(first_error_code(resp), "CONFLICT");

    // Re-submitting the user's own name is not a conflict.
    let resp = exec(
        &schema,
        update,
        json!({"id": bob_id, "input": {"name": "bob"}}),
    )
    .await;
    assert_eq!(data(resp)["updateUser"]["name"], "bob");
}

#[tokio::test]
async fn dangling_admin_reference_is_rejected_without_auto_provision() {
    let schema = schema_with(false).await;
    let resp = exec(
        &schema,
        "mutation($input: NewProject!) { addProject(input: $input) { id } }",
        json!({"input": {
            "title": "p", "description": "d",
            "startDate": "2026-09-01", "endDate": "2026-12-20",
            "createdBy": "no-such-admin",
        }}),
    )
    .await;
    assert_eq!(first_error_code(resp), "VALIDATION");
}

#[tokio::test]
async fn auto_provision_fabricates_default_admin() {
    let schema = schema_with(true).await;
    let resp = exec(
        &schema,
        "mutation($input: NewProject!) {
            addProject(input: $input) { id createdBy creator { id user { name } } }
        }",
        json!({"input": {
            "title": "p", "description": "d",
            "startDate": "2026-09-01", "endDate": "2026-12-20",
            "createdBy": "ghost-admin",
        }}),
    )
    .await;
    let project = &data(resp)["addProject"];
    assert_eq!(project["createdBy"], "ghost-admin");
    assert_eq!(project["creator"]["id"], "ghost-admin");
    assert_eq!(project["creator"]["user"]["name"], "Default Admin");
}

#[tokio::test]
async fn update_task_changes_only_the_given_field() {
    let schema = schema_with(false).await;
    let user_id = add_user(&schema, "grace", "g@x.com", "ADMIN").await;
    let admin_id = add_admin(&schema, &user_id).await;
    let project_id = add_project(&schema, "portal", &admin_id).await;

    let resp = exec(
        &schema,
        "mutation($input: NewTask!) { addTask(input: $input) { id title status dueDate } }",
        json!({"input": {
            "title": "write docs", "description": "d", "dueDate": "2026-10-01",
            "projectId": project_id, "createdBy": admin_id, "status": "PENDING",
        }}),
    )
    .await;
    let task = data(resp)["addTask"].clone();
    let task_id = task["id"].as_str().unwrap().to_string();

    let resp = exec(
        &schema,
        "mutation($id: String!, $input: UpdateTask!) {
            updateTask(id: $id, input: $input) { id title description status dueDate projectId }
        }",
        json!({"id": task_id, "input": {"status": "COMPLETED"}}),
    )
    .await;
    let updated = &data(resp)["updateTask"];
    assert_eq!(updated["status"], "COMPLETED");
    assert_eq!(updated["title"], "write docs");
    assert_eq!(updated["description"], "d");
    assert_eq!(updated["dueDate"], "2026-10-01");
}

#[tokio::test]
async fn update_task_on_missing_id_is_not_found() {
    let schema = schema_with(false).await;
    let resp = exec(
        &schema,
        "mutation($id: String!, $input: UpdateTask!) { updateTask(id: $id, input: $input) { id } }",
        json!({"id": "missing", "input": {"status": "COMPLETED"}}),
    )
    .await;
    assert!(first_error_message(&resp).contains("Task not found"));
    assert_eq!(first_error_code(resp), "NOT_FOUND");
}

#[tokio::test]
async fn delete_returns_entity_then_get_one_fails() {
    let schema = schema_with(false).await;
    let user_id = add_user(&schema, "grace", "g@x.com", "ADMIN").await;
    let admin_id = add_admin(&schema, &user_id).await;
    let project_id = add_project(&schema, "portal", &admin_id).await;

    let resp = exec(
        &schema,
        "mutation($id: String!) { deleteProject(id: $id) { id title } }",
        json!({"id": project_id}),
    )
    .await;
    assert_eq!(data(resp)["deleteProject"]["title"], "portal");

    let resp = exec(
        &schema,
        "query($id: String!) { project(id: $id) { id } }",
        json!({"id": project_id}),
    )
    .await;
    assert_eq!(first_error_code(resp), "NOT_FOUND");
}

#[tokio::test]
async fn update_project_merges_partial_fields() {
    let schema = schema_with(false).await;
    let user_id = add_user(&schema, "grace", "g@x.com", "ADMIN").await;
    let admin_id = add_admin(&schema, &user_id).await;
    let project_id = add_project(&schema, "portal", &admin_id).await;

    let resp = exec(
        &schema,
        "mutation($id: String!, $input: UpdateProject!) {
            updateProject(id: $id, input: $input) { title progress status startDate }
        }",
        json!({"id": project_id, "input": {"progress": 40}}),
    )
    .await;
    let updated = &data(resp)["updateProject"];
    assert_eq!(updated["progress"], 40);
    assert_eq!(updated["title"], "portal");
    assert_eq!(updated["status"], "NOT_STARTED");
    assert_eq!(updated["startDate"], "2026-09-01");
}

#[tokio::test]
async fn admin_requires_existing_user_with_admin_role() {
    let schema = schema_with(false).await;
    let student_id = add_user(&schema, "sam", "s@x.com", "STUDENT").await;

    let resp = exec(
        &schema,
        "mutation($input: NewAdmin!) { addAdmin(input: $input) { id } }",
        json!({"input": {"userId": student_id, "permissions": []}}),
    )
    .await;
    assert_eq!(first_error_code(resp), "VALIDATION");

    let resp = exec(
        &schema,
        "mutation($input: NewAdmin!) { addAdmin(input: $input) { id } }",
        json!({"input": {"userId": "nobody", "permissions": []}}),
    )
    .await;
    assert_eq!(first_error_code(resp), "VALIDATION");
}

#[tokio::test]
async fn task_registers_itself_on_its_project() {
    let schema = schema_with(false).await;
    let user_id = add_user(&schema, "grace", "g@x.com", "ADMIN").await;
    let admin_id = add_admin(&schema, &user_id).await;
    let project_id = add_project(&schema, "portal", &admin_id).await;

    let resp = exec(
        &schema,
        "mutation($input: NewTask!) { addTask(input: $input) { id } }",
        json!({"input": {
            "title": "t1", "description": "d", "dueDate": "2026-10-01",
            "projectId": project_id, "createdBy": admin_id,
        }}),
    )
    .await;
    let task_id = data(resp)["addTask"]["id"].as_str().unwrap().to_string();

    let resp = exec(
        &schema,
        "query($id: String!) { project(id: $id) { tasks taskList { id title } } }",
        json!({"id": project_id}),
    )
    .await;
    let project = &data(resp)["project"];
    assert_eq!(project["tasks"][0], task_id.as_str());
    assert_eq!(project["taskList"][0]["title"], "t1");
}

#[tokio::test]
async fn duplicate_task_title_is_a_conflict() {
    let schema = schema_with(false).await;
    let user_id = add_user(&schema, "grace", "g@x.com", "ADMIN").await;
    let admin_id = add_admin(&schema, &user_id).await;
    let project_id = add_project(&schema, "portal", &admin_id).await;

    let input = json!({"input": {
        "title": "same", "description": "d", "dueDate": "2026-10-01",
        "projectId": project_id, "createdBy": admin_id,
    }});
    let add_task = "mutation($input: NewTask!) { addTask(input: $input) { id } }";

    data(exec(&schema, add_task, input.clone()).await);
    let resp = exec(&schema, add_task, input).await;
    assert_eq!(first_error_code(resp), "CONFLICT");
}

#[tokio::test]
async fn login_returns_token_for_valid_credentials() {
    let schema = schema_with(false).await;
    add_user(&schema, "alice", "a@x.com", "STUDENT").await;

    let login = "mutation($name: String!, $password: String!) {
        login(name: $name, password: $password) { token user { name } }
    }";

    let resp = exec(&schema, login, json!({"name": "alice", "password": "p"})).await;
    let payload = &data(resp)["login"];
    assert_eq!(payload["user"]["name"], "alice");
    assert!(!payload["token"].as_str().unwrap().is_empty());

    let resp = exec(&schema, login, json!({"name": "alice", "password": "wrong"})).await;
    assert_eq!(first_error_code(resp), "UNAUTHENTICATED");
}

#[tokio::test]
async fn messages_require_a_session() {
    let schema = schema_with(false).await;
    let resp = exec(&schema, "query { messages { id } }", json!({})).await;
    assert_eq!(first_error_code(resp), "UNAUTHENTICATED");
}

#[tokio::test]
async fn message_lifecycle_between_two_users() {
    let schema = schema_with(false).await;
    let sender_id = add_user(&schema, "alice", "a@x.com", "STUDENT").await;
    let receiver_id = add_user(&schema, "grace", "g@x.com", "ADMIN").await;

    let sender = Session {
        user_id: sender_id.clone(),
        role: Role::Student,
    };
    let receiver = Session {
        user_id: receiver_id.clone(),
        role: Role::Admin,
    };

    let resp = exec_as(
        &schema,
        "mutation($input: NewMessage!) { addMessage(input: $input) { id content read sender { id } } }",
        json!({"input": {"content": "hello", "receiver": {"id": receiver_id, "role": "ADMIN"}}}),
        sender.clone(),
    )
    .await;
    let message = data(resp)["addMessage"].clone();
    let message_id = message["id"].as_str().unwrap().to_string();
    assert_eq!(message["read"], false);
    assert_eq!(message["sender"]["id"], sender_id.as_str());

    // Both participants see it; a third party does not.
    let resp = exec_as(&schema, "query { messages { id } }", json!({}), receiver.clone()).await;
    assert_eq!(data(resp)["messages"].as_array().unwrap().len(), 1);
    let outsider = Session {
        user_id: "someone-else".to_string(),
        role: Role::Student,
    };
    let resp = exec_as(&schema, "query { messages { id } }", json!({}), outsider).await;
    assert!(data(resp)["messages"].as_array().unwrap().is_empty());

    // Only the receiver can mark it read.
    let mark_read = "mutation($id: String!) { markMessageRead(id: $id) { id read } }";
    let resp = exec_as(&schema, mark_read, json!({"id": message_id}), sender.clone()).await;
    assert_eq!(first_error_code(resp), "UNAUTHENTICATED");
    let resp = exec_as(&schema, mark_read, json!({"id": message_id}), receiver.clone()).await;
    assert_eq!(data(resp)["markMessageRead"]["read"], true);

    // Only the sender can delete it.
    let delete = "mutation($id: String!) { deleteMessage(id: $id) { id } }";
    let resp = exec_as(&schema, delete, json!({"id": message_id}), receiver).await;
    assert_eq!(first_error_code(resp), "UNAUTHENTICATED");
    let resp = exec_as(&schema, delete, json!({"id": message_id}), sender.clone()).await;
    assert_eq!(data(resp)["deleteMessage"]["id"], message_id.as_str());

    let resp = exec_as(&schema, "query { messages { id } }", json!({}), sender).await;
    assert!(data(resp)["messages"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn deleting_a_student_leaves_dangling_references_and_queries_tolerate_them() {
    let schema = schema_with(false).await;
    let admin_user = add_user(&schema, "grace", "g@x.com", "ADMIN").await;
    let admin_id = add_admin(&schema, &admin_user).await;
    let student_user = add_user(&schema, "sam", "s@x.com", "STUDENT").await;

    let resp = exec(
        &schema,
        "mutation($input: NewStudent!) { addStudent(input: $input) { id } }",
        json!({"input": {"userId": student_user, "universityId": "U1", "major": "CS", "year": 2}}),
    )
    .await;
    let student_id = data(resp)["addStudent"]["id"].as_str().unwrap().to_string();

    let resp = exec(
        &schema,
        "mutation($input: NewProject!) { addProject(input: $input) { id } }",
        json!({"input": {
            "title": "p", "description": "d",
            "startDate": "2026-09-01", "endDate": "2026-12-20",
            "createdBy": admin_id, "studentsWorkingOn": [student_id],
        }}),
    )
    .await;
    let project_id = data(resp)["addProject"]["id"].as_str().unwrap().to_string();

    data(
        exec(
            &schema,
            "mutation($id: String!) { deleteStudent(id: $id) { id } }",
            json!({"id": student_id}),
        )
        .await,
    );

    // The id stays on the project; resolving students skips the gone record.
    let resp = exec(
        &schema,
        "query($id: String!) { project(id: $id) { studentsWorkingOn students { id } } }",
        json!({"id": project_id}),
    )
    .await;
    let project = &data(resp)["project"];
    assert_eq!(project["studentsWorkingOn"].as_array().unwrap().len(), 1);
    assert!(project["students"].as_array().unwrap().is_empty());
}
