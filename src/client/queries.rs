// Operation strings sent by the dashboard. Field names mirror the schema
// layer; a schema rename must be mirrored here by hand.

pub const GET_USERS_QUERY: &str = "
query Users {
  users { id name email role createdAt }
}";

pub const GET_USER_QUERY: &str = "
query User($id: String!) {
  user(id: $id) { id name email role createdAt }
}";

pub const ADD_USER_MUTATION: &str = "
mutation AddUser($input: NewUser!) {
  addUser(input: $input) { id name email role createdAt }
}";

pub const UPDATE_USER_MUTATION: &str = "
mutation UpdateUser($id: String!, $input: UpdateUser!) {
  updateUser(id: $id, input: $input) { id name email role }
}";

pub const DELETE_USER_MUTATION: &str = "
mutation DeleteUser($id: String!) {
  deleteUser(id: $id) { id name }
}";

pub const LOGIN_MUTATION: &str = "
mutation Login($name: String!, $password: String!) {
  login(name: $name, password: $password) {
    token
    user { id name email role }
  }
}";

pub const GET_ADMINS_QUERY: &str = "
query Admins {
  admins { id userId permissions user { id name email } }
}";

pub const ADD_ADMIN_MUTATION: &str = "
mutation AddAdmin($input: NewAdmin!) {
  addAdmin(input: $input) { id userId permissions }
}";

pub const DELETE_ADMIN_MUTATION: &str = "
mutation DeleteAdmin($id: String!) {
  deleteAdmin(id: $id) { id userId }
}";

pub const GET_STUDENTS_QUERY: &str = "
query Students {
  students { id userId universityId major year user { id name email } }
}";

pub const ADD_STUDENT_MUTATION: &str = "
mutation AddStudent($input: NewStudent!) {
  addStudent(input: $input) { id userId universityId major year }
}";

pub const UPDATE_STUDENT_MUTATION: &str = "
mutation UpdateStudent($id: String!, $input: UpdateStudent!) {
  updateStudent(id: $id, input: $input) { id universityId major year }
}";

pub const DELETE_STUDENT_MUTATION: &str = "
mutation DeleteStudent($id: String!) {
  deleteStudent(id: $id) { id }
}";

pub const GET_PROJECTS_QUERY: &str = "
query Projects {
  projects {
    id title description startDate endDate status progress
    createdBy studentsWorkingOn tasks createdAt
  }
}";

pub const GET_PROJECT_QUERY: &str = "
query Project($id: String!) {
  project(id: $id) {
    id title description startDate endDate status progress
    students { id major }
    taskList { id title status dueDate }
  }
}";

pub const ADD_PROJECT_MUTATION: &str = "
mutation AddProject($input: NewProject!) {
  addProject(input: $input) { id title status progress createdBy }
}";

pub const UPDATE_PROJECT_MUTATION: &str = "
mutation UpdateProject($id: String!, $input: UpdateProject!) {
  updateProject(id: $id, input: $input) { id title status progress }
}";

pub const DELETE_PROJECT_MUTATION: &str = "
mutation DeleteProject($id: String!) {
  deleteProject(id: $id) { id title }
}";

pub const GET_TASKS_QUERY: &str = "
query Tasks {
  tasks {
    id title description dueDate status projectId createdBy
    studentsWorkingOn createdAt
  }
}";

pub const GET_TASK_QUERY: &str = "
query Task($id: String!) {
  task(id: $id) { id title description dueDate status projectId }
}";

pub const ADD_TASK_MUTATION: &str = "
mutation AddTask($input: NewTask!) {
  addTask(input: $input) { id title status dueDate projectId }
}";

pub const UPDATE_TASK_MUTATION: &str = "
mutation UpdateTask($id: String!, $input: UpdateTask!) {
  updateTask(id: $id, input: $input) { id title status dueDate }
}";

pub const DELETE_TASK_MUTATION: &str = "
mutation DeleteTask($id: String!) {
  deleteTask(id: $id) { id title }
}";

pub const GET_MESSAGES_QUERY: &str = "
query Messages {
  messages {
    id content read timestamp
    sender { id role }
    receiver { id role }
  }
}";

pub const ADD_MESSAGE_MUTATION: &str = "
mutation AddMessage($input: NewMessage!) {
  addMessage(input: $input) { id content read timestamp }
}";

pub const MARK_MESSAGE_READ_MUTATION: &str = "
mutation MarkMessageRead($id: String!) {
  markMessageRead(id: $id) { id read }
}";

pub const DELETE_MESSAGE_MUTATION: &str = "
mutation DeleteMessage($id: String!) {
  deleteMessage(id: $id) { id }
}";
