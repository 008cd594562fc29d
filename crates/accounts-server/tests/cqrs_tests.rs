//! Dispatching commands and queries through the mediator

mod helpers;

use accounts_server::cqrs::build_mediator;
use accounts_server::features::auth::{LoginCommand, LoginError, LoginResponse};
use accounts_server::features::users::{
    CreateUserCommand, CreateUserError, CreateUserResponse, ListUsersError, ListUsersQuery,
    ListUsersResponse,
};
use helpers::TestApp;
use mediator::AsyncMediator;

#[tokio::test(flavor = "multi_thread")]
async fn test_commands_and_queries_through_mediator() {
    let app = TestApp::new();
    let mut mediator = build_mediator(app.state.clone());

    let created: Result<CreateUserResponse, CreateUserError> = mediator
        .send(CreateUserCommand {
            username: "admin".to_string(),
            password: "admin".to_string(),
        })
        .await
        .unwrap();
    let created = created.unwrap();
    assert_eq!(created.username, "admin");

    let listed: Result<ListUsersResponse, ListUsersError> =
        mediator.send(ListUsersQuery::default()).await.unwrap();
    let listed = listed.unwrap();
    assert_eq!(listed.total_count, 1);
    assert_eq!(listed.user_list[0].say_hello, format!("Hello X{}", created.id));

    let login: Result<LoginResponse, LoginError> = mediator
        .send(LoginCommand {
            username: "admin".to_string(),
            password: "admin".to_string(),
        })
        .await
        .unwrap();
    let claims = app.state.tokens.parse(&login.unwrap().token).unwrap();
    assert_eq!(claims.id, created.id);
}
