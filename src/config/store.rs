//! Shared runtime configuration.
//!
//! The store is a synchronized value cell: handlers read it on every request
//! and the lifecycle coordinator replaces it wholesale after a transition has
//! been applied. Readers always observe one complete [`AgentConfig`].

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::schema::AgentConfig;

/// Cloneable handle to the current configuration.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    current: Arc<ArcSwap<AgentConfig>>,
}

impl ConfigStore {
    pub fn new(initial: AgentConfig) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(initial)),
        }
    }

    /// Current configuration. Never blocks on I/O.
    pub fn get(&self) -> AgentConfig {
        **self.current.load()
    }

    /// Replace the current configuration. Last writer wins.
    pub fn set(&self, config: AgentConfig) {
        self.current.store(Arc::new(config));
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(AgentConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn set_replaces_value_for_all_handles() {
        let store = ConfigStore::default();
        let other = store.clone();

        store.set(AgentConfig::default().with_port(1234));

        assert_eq!(other.get().port, 1234);
    }

    #[test]
    fn concurrent_readers_see_whole_snapshots() {
        let store = ConfigStore::new(AgentConfig {
            port: 1000,
            shutdown_timeout_secs: 1000,
            autostart: false,
        });

        let writer = {
            let store = store.clone();
            thread::spawn(move || {
                for n in 1001..3000u16 {
                    store.set(AgentConfig {
                        port: n,
                        shutdown_timeout_secs: u32::from(n),
                        autostart: n % 2 == 0,
                    });
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..10_000 {
                        let seen = store.get();
                        assert_eq!(u32::from(seen.port), seen.shutdown_timeout_secs);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(store.get().port, 2999);
    }
}
