use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Result as SqlResult};
use std::collections::HashSet;
use std::path::PathBuf;

/// Storage key the favorites set lives under
const FAVORITES_KEY: &str = "favorites";

/// Durable key-value capability backing the favorites set.
///
/// The adapter only ever needs one key; reads happen once at startup and
/// writes are fire-and-forget, so implementations log failures instead of
/// returning them.
pub trait KeyValue {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// SQLite-backed key-value store.
/// It keeps the favorites set (and nothing else, today) across sessions.
pub struct SqliteKv {
    conn: Connection,
    db_path: PathBuf,
}

impl SqliteKv {
    /// Create a new store and initialize the database.
    ///
    /// The database file is created in the user's data directory:
    /// - Linux: ~/.local/share/desi-bazaar/bazaar.db
    /// - macOS: ~/Library/Application Support/desi-bazaar/bazaar.db
    /// - Windows: %APPDATA%\desi-bazaar\bazaar.db
    pub fn new() -> SqlResult<Self> {
        let db_path = Self::get_db_path();

        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .expect("Failed to create application data directory");
        }

        // Open or create the database
        let conn = Connection::open(&db_path)?;

        println!("📁 Favorites store initialized at: {}", db_path.display());

        let mut store = SqliteKv { conn, db_path };
        store.init_schema()?;

        Ok(store)
    }

    /// Get the path where the database should be stored
    fn get_db_path() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .expect("Could not determine user data directory");

        path.push("desi-bazaar");
        path.push("bazaar.db");
        path
    }

    /// Initialize the database schema.
    /// Creates the key-value table if it doesn't exist.
    fn init_schema(&mut self) -> SqlResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key             TEXT PRIMARY KEY,
                value           TEXT NOT NULL,
                updated_at      INTEGER NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// In-memory store for tests
    #[cfg(test)]
    pub fn open_in_memory() -> SqlResult<Self> {
        let conn = Connection::open_in_memory()?;
        let mut store = SqliteKv {
            conn,
            db_path: PathBuf::from(":memory:"),
        };
        store.init_schema()?;
        Ok(store)
    }
}

impl KeyValue for SqliteKv {
    fn get(&self, key: &str) -> Option<String> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .ok()
            .flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        // Last write wins; a failed write degrades silently to session-only
        // favorites rather than surfacing an error.
        let result = self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![key, value, Utc::now().timestamp()],
        );

        if let Err(e) = result {
            eprintln!("⚠️  Failed to persist {}: {:?}", key, e);
        }
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for SqliteKv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteKv")
            .field("db_path", &self.db_path)
            .finish()
    }
}

/// The favorites set: toggled set-membership over product ids, written
/// through the key-value capability after every mutation.
pub struct Favorites<K: KeyValue> {
    store: K,
    ids: HashSet<u32>,
}

impl<K: KeyValue> Favorites<K> {
    /// Read the persisted set once at startup.
    /// A missing or malformed stored value means an empty set, never an error.
    pub fn load(store: K) -> Self {
        let ids = store
            .get(FAVORITES_KEY)
            .and_then(|raw| serde_json::from_str::<Vec<u32>>(&raw).ok())
            .unwrap_or_default()
            .into_iter()
            .collect();

        Favorites { store, ids }
    }

    /// Toggle membership for a product id.
    /// Returns the new membership and persists the full set.
    pub fn toggle(&mut self, id: u32) -> bool {
        let now_on = if self.ids.contains(&id) {
            self.ids.remove(&id);
            false
        } else {
            self.ids.insert(id);
            true
        };

        self.persist();
        now_on
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Serialize the whole set as a sorted JSON id array and write it through
    fn persist(&mut self) {
        let mut ids: Vec<u32> = self.ids.iter().copied().collect();
        ids.sort_unstable();

        match serde_json::to_string(&ids) {
            Ok(json) => self.store.set(FAVORITES_KEY, &json),
            Err(e) => eprintln!("⚠️  Failed to serialize favorites: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Minimal in-memory capability for exercising the adapter contract
    #[derive(Default)]
    struct MemoryKv {
        map: HashMap<String, String>,
    }

    impl KeyValue for MemoryKv {
        fn get(&self, key: &str) -> Option<String> {
            self.map.get(key).cloned()
        }

        fn set(&mut self, key: &str, value: &str) {
            self.map.insert(key.to_string(), value.to_string());
        }
    }

    #[test]
    fn test_missing_value_loads_empty_set() {
        let favorites = Favorites::load(MemoryKv::default());
        assert_eq!(favorites.len(), 0);
    }

    #[test]
    fn test_malformed_value_loads_empty_set_and_still_toggles() {
        let mut store = MemoryKv::default();
        store.set(FAVORITES_KEY, "not json at all {{{");

        let mut favorites = Favorites::load(store);
        assert_eq!(favorites.len(), 0);

        assert!(favorites.toggle(3));
        assert!(favorites.contains(3));
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let mut favorites = Favorites::load(MemoryKv::default());

        assert!(favorites.toggle(7));
        assert!(favorites.contains(7));

        assert!(!favorites.toggle(7));
        assert!(!favorites.contains(7));
        assert_eq!(favorites.len(), 0);
    }

    #[test]
    fn test_every_mutation_writes_the_full_set() {
        let mut favorites = Favorites::load(MemoryKv::default());
        favorites.toggle(2);
        favorites.toggle(9);
        favorites.toggle(1);

        let raw = favorites.store.get(FAVORITES_KEY).unwrap();
        let ids: Vec<u32> = serde_json::from_str(&raw).unwrap();
        assert_eq!(ids, [1, 2, 9]);

        favorites.toggle(2);
        let raw = favorites.store.get(FAVORITES_KEY).unwrap();
        let ids: Vec<u32> = serde_json::from_str(&raw).unwrap();
        assert_eq!(ids, [1, 9]);
    }

    #[test]
    fn test_round_trips_through_its_own_format() {
        let mut first = Favorites::load(MemoryKv::default());
        first.toggle(4);
        first.toggle(11);

        // Reload from the same backing store: membership survives
        let second = Favorites::load(first.store);
        assert!(second.contains(4));
        assert!(second.contains(11));
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn test_sqlite_store_round_trips() {
        let mut kv = SqliteKv::open_in_memory().unwrap();
        assert_eq!(kv.get(FAVORITES_KEY), None);

        kv.set(FAVORITES_KEY, "[1,5]");
        assert_eq!(kv.get(FAVORITES_KEY).as_deref(), Some("[1,5]"));

        // Last write wins on the same key
        kv.set(FAVORITES_KEY, "[5]");
        assert_eq!(kv.get(FAVORITES_KEY).as_deref(), Some("[5]"));
    }

    #[test]
    fn test_favorites_over_sqlite() {
        let kv = SqliteKv::open_in_memory().unwrap();
        let mut favorites = Favorites::load(kv);

        assert!(favorites.toggle(12));
        assert!(!favorites.toggle(12));
        assert!(favorites.toggle(12));

        let reloaded = Favorites::load(favorites.store);
        assert!(reloaded.contains(12));
    }
}
