#![allow(dead_code)]

use engine::{Engine, NewUser, User};
use migration::MigratorTrait;
use sea_orm::Database;

pub async fn engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

pub async fn user(engine: &Engine, name: &str) -> User {
    engine
        .register_user(NewUser::new(name, format!("{name}@example.com"), "secret1"))
        .await
        .unwrap()
}

pub async fn befriend(engine: &Engine, a: &User, b: &User) {
    engine.send_friend_request(a.id, b.id).await.unwrap();
    engine.accept_friend_request(b.id, a.id).await.unwrap();
}
