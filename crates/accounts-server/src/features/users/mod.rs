pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{
    CreateUserCommand, CreateUserError, CreateUserResponse, DeleteUserCommand, DeleteUserError,
    DeleteUserResponse, UpdateUserCommand, UpdateUserError, UpdateUserResponse,
};

pub use queries::{
    GetUserError, GetUserQuery, GetUserResponse, ListUsersError, ListUsersQuery,
    ListUsersResponse,
};

pub use routes::users_routes;
