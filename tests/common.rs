#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rmatlog::core::context::Context;
use rmatlog::core::gym::GymLogic;
use rmatlog::core::member::MemberLogic;
use rmatlog::db::initialize::init_db;
use rmatlog::db::pool::DbPool;
use rmatlog::models::belt::Belt;
use rusqlite::Connection;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rml() -> Command {
    cargo_bin_cmd!("rmatlog")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rmatlog.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Ids created by [`seed`].
#[derive(Debug, Clone, Copy)]
pub struct Seed {
    /// Gym owner, also a trainee.
    pub owner: i64,
    /// Regular member of the gym.
    pub trainee: i64,
    /// Second regular member, used as a sparring partner.
    pub partner: i64,
    pub gym: i64,
}

impl Seed {
    pub fn trainee_ctx(&self) -> Context {
        Context::new(self.trainee, self.gym)
    }

    pub fn owner_ctx(&self) -> Context {
        Context::new(self.owner, self.gym)
    }
}

/// One gym with an owner and two members.
pub fn seed(conn: &Connection) -> Seed {
    init_db(conn).expect("init db");

    let owner = MemberLogic::add(conn, "Coach Ana", Belt::Black, 2).expect("owner");
    let trainee = MemberLogic::add(conn, "Bruno", Belt::White, 1).expect("trainee");
    let partner = MemberLogic::add(conn, "Carla", Belt::Blue, 0).expect("partner");

    let gym = GymLogic::create(conn, owner.id, "Mat Lab", Some("MATLAB-1")).expect("gym");
    GymLogic::join(conn, trainee.id, "MATLAB-1").expect("join trainee");
    GymLogic::join(conn, partner.id, "MATLAB-1").expect("join partner");

    Seed {
        owner: owner.id,
        trainee: trainee.id,
        partner: partner.id,
        gym: gym.id,
    }
}

/// Fresh in-memory store with the standard seed.
pub fn memory_store() -> (DbPool, Seed) {
    let pool = DbPool::in_memory().expect("in-memory db");
    let s = seed(&pool.conn);
    (pool, s)
}

/// File-backed store for CLI tests: schema plus seed, ids passed with
/// `--trainee`/`--gym`.
pub fn file_store(name: &str) -> (String, Seed) {
    let db_path = setup_test_db(name);
    let pool = DbPool::new(&db_path).expect("open db");
    let s = seed(&pool.conn);
    (db_path, s)
}

/// Base args for a CLI call acting as the seeded trainee.
pub fn as_trainee(db_path: &str, s: &Seed) -> Vec<String> {
    vec![
        "--db".into(),
        db_path.into(),
        "--trainee".into(),
        s.trainee.to_string(),
        "--gym".into(),
        s.gym.to_string(),
    ]
}

pub fn as_owner(db_path: &str, s: &Seed) -> Vec<String> {
    vec![
        "--db".into(),
        db_path.into(),
        "--trainee".into(),
        s.owner.to_string(),
        "--gym".into(),
        s.gym.to_string(),
    ]
}
