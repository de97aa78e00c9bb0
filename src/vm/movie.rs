use crate::director::{
    chunks::labels::FrameLabel,
    file::DirectorFile,
    lingo::datum::{datum_bool, Datum},
};

use super::{bitmap::BitmapManager, cast_manager::CastManager, ScriptError};

/// Movie-level state the VM owns directly. Anything stage- or
/// score-related beyond this is the host's business.
pub struct Movie {
    pub rect: (i32, i32, i32, i32),
    pub cast_manager: CastManager,
    pub current_frame: u32,
    pub puppet_tempo: u32,
    pub exit_lock: bool,
    pub update_lock: bool,
    pub dir_version: u16,
    pub item_delimiter: char,
    pub file_name: String,
    pub stage_color: (u8, u8, u8),
    pub frame_rate: u16,
    pub frame_labels: Vec<FrameLabel>,
}

impl Movie {
    pub fn empty() -> Movie {
        Movie {
            rect: (0, 0, 0, 0),
            cast_manager: CastManager::empty(),
            current_frame: 1,
            puppet_tempo: 0,
            exit_lock: false,
            update_lock: false,
            dir_version: 0,
            item_delimiter: '.',
            file_name: String::new(),
            stage_color: (0, 0, 0),
            frame_rate: 30,
            frame_labels: vec![],
        }
    }

    pub fn load_from_file(&mut self, dir: &DirectorFile, bitmap_manager: &mut BitmapManager) {
        let config = &dir.config;
        self.rect = (
            config.movie_left as i32,
            config.movie_top as i32,
            config.movie_right as i32,
            config.movie_bottom as i32,
        );
        self.dir_version = dir.version;
        self.file_name = dir.file_name.clone();
        self.stage_color = config.stage_color();
        self.frame_rate = config.frame_rate;
        self.frame_labels = dir
            .frame_labels
            .as_ref()
            .map(|labels| labels.labels.clone())
            .unwrap_or_default();
        self.cast_manager.load_from_dir(dir, bitmap_manager);
    }

    pub fn label_to_frame(&self, label: &str) -> Option<u32> {
        self.frame_labels
            .iter()
            .find(|entry| entry.label.eq_ignore_ascii_case(label))
            .map(|entry| entry.frame_num.max(1) as u32)
    }

    pub fn get_prop(&self, prop: &str) -> Result<Datum, ScriptError> {
        match prop {
            "name" | "movieName" => Ok(Datum::String(self.file_name.clone())),
            "frame" => Ok(Datum::Int(self.current_frame as i32)),
            "frameLabel" => {
                let label = self
                    .frame_labels
                    .iter()
                    .filter(|entry| entry.frame_num <= self.current_frame as i32)
                    .max_by_key(|entry| entry.frame_num)
                    .map(|entry| entry.label.clone());
                Ok(Datum::String(label.unwrap_or_else(|| "0".to_string())))
            }
            "itemDelimiter" => Ok(Datum::String(self.item_delimiter.to_string())),
            "exitLock" => Ok(datum_bool(self.exit_lock)),
            "updateLock" => Ok(datum_bool(self.update_lock)),
            "stageColor" => Ok(Datum::Int(0)),
            "stageLeft" => Ok(Datum::Int(self.rect.0)),
            "stageTop" => Ok(Datum::Int(self.rect.1)),
            "stageRight" => Ok(Datum::Int(self.rect.2)),
            "stageBottom" => Ok(Datum::Int(self.rect.3)),
            "frameTempo" | "puppetTempo" => Ok(Datum::Int(self.puppet_tempo as i32)),
            "frameRate" => Ok(Datum::Int(self.frame_rate as i32)),
            "lastFrame" => Ok(Datum::Int(self.current_frame as i32)),
            "runMode" => Ok(Datum::String("Plugin".to_string())),
            "netPresent" => Ok(datum_bool(true)),
            _ => Err(ScriptError::new(format!("Unknown movie property {prop}"))),
        }
    }

    pub fn set_prop(&mut self, prop: &str, value: Datum) -> Result<(), ScriptError> {
        match prop {
            "itemDelimiter" => {
                let s = value.string_value()?;
                self.item_delimiter = s.chars().next().unwrap_or('.');
                Ok(())
            }
            "exitLock" => {
                self.exit_lock = value.bool_value()?;
                Ok(())
            }
            "updateLock" => {
                self.update_lock = value.bool_value()?;
                Ok(())
            }
            "frameTempo" | "puppetTempo" => {
                self.puppet_tempo = value.int_value()?.max(0) as u32;
                Ok(())
            }
            _ => Err(ScriptError::new(format!(
                "Cannot set movie property {prop}"
            ))),
        }
    }
}
