use std::{fs, path::Path};

use listing::SortConfig;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// List preferences remembered between runs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocalState {
    pub lists: Vec<ListPrefs>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPrefs {
    pub section: String,
    pub page_size: usize,
    pub sort: Option<SortConfig>,
}

impl LocalState {
    pub fn load(path: &str) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let parent = Path::new(path).parent();
        if let Some(parent) = parent {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }

    pub fn prefs_for(&self, section: &str) -> Option<&ListPrefs> {
        self.lists.iter().find(|entry| entry.section == section)
    }

    pub fn set_prefs(&mut self, prefs: ListPrefs) {
        match self
            .lists
            .iter_mut()
            .find(|entry| entry.section == prefs.section)
        {
            Some(entry) => *entry = prefs,
            None => self.lists.push(prefs),
        }
    }
}
