//! Service for resolving the watch directory.
//!
//! Picks between the user's override, the OS screenshot location, and the
//! Desktop fallback, and persists overrides in [`Preferences`].

use crate::config::{FALLBACK_DIR_NAME, SCREENCAPTURE_DOMAIN, SCREENCAPTURE_LOCATION_KEY};
use crate::file_utils::{self, expand_tilde};
use crate::preferences::Preferences;
use log::{debug, info};
use std::path::PathBuf;

/// Where the active directory came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryOrigin {
    DetectedDefault,
    UserOverride,
}

/// The active watch directory and its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryConfig {
    pub path: PathBuf,
    pub origin: DirectoryOrigin,
}

/// Reads the OS-configured screenshot location.
pub trait LocationSource {
    /// Raw configured location, possibly `~`-prefixed. `None` when unset.
    fn screenshot_location(&self) -> Option<String>;
}

/// Source backed by the `com.apple.screencapture` defaults domain.
///
/// Always reports `None` on platforms other than macOS.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLocationSource;

impl LocationSource for SystemLocationSource {
    fn screenshot_location(&self) -> Option<String> {
        #[cfg(target_os = "macos")]
        {
            read_screencapture_location_macos()
        }

        #[cfg(not(target_os = "macos"))]
        {
            debug!(
                "No {} {} preference on this platform",
                SCREENCAPTURE_DOMAIN, SCREENCAPTURE_LOCATION_KEY
            );
            None
        }
    }
}

#[cfg(target_os = "macos")]
fn read_screencapture_location_macos() -> Option<String> {
    use objc2::rc::{autoreleasepool, Allocated, Retained};
    use objc2::{msg_send, ClassType};
    use objc2_foundation::{NSString, NSUserDefaults};

    autoreleasepool(|_| {
        let domain = NSString::from_str(SCREENCAPTURE_DOMAIN);
        let key = NSString::from_str(SCREENCAPTURE_LOCATION_KEY);

        let allocated: Allocated<NSUserDefaults> = unsafe {
            // 安全性: NSUserDefaultsのallocはクラスメソッド
            msg_send![NSUserDefaults::class(), alloc]
        };
        let defaults: Option<Retained<NSUserDefaults>> = unsafe {
            // 安全性: suiteNameはNSString、失敗時はnil
            msg_send![allocated, initWithSuiteName: &*domain]
        };
        let defaults = defaults?;

        let location: Option<Retained<NSString>> = unsafe {
            // 安全性: stringForKeyは文字列以外の値に対してnilを返す
            msg_send![&*defaults, stringForKey: &*key]
        };
        let location = location.map(|value| value.to_string());
        debug!("{} {} = {:?}", SCREENCAPTURE_DOMAIN, SCREENCAPTURE_LOCATION_KEY, location);
        location
    })
}

/// Resolves the active directory and owns the persisted override.
pub struct DirectoryResolver {
    preferences: Preferences,
    home: PathBuf,
    location: Box<dyn LocationSource>,
}

impl DirectoryResolver {
    /// Creates a resolver with an explicit home directory and location source.
    pub fn new(preferences: Preferences, home: PathBuf, location: Box<dyn LocationSource>) -> Self {
        Self {
            preferences,
            home,
            location,
        }
    }

    /// Creates a resolver for the current user and OS.
    pub fn system(preferences: Preferences) -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
        Self::new(preferences, home, Box::new(SystemLocationSource))
    }

    /// Returns the directory to watch.
    ///
    /// Never fails: an override that no longer exists falls through to the OS
    /// location, and a missing OS location falls through to `~/Desktop`.
    pub fn current_config(&self) -> DirectoryConfig {
        if let Some(custom) = self.preferences.custom_directory() {
            if custom.exists() {
                return DirectoryConfig {
                    path: custom.to_path_buf(),
                    origin: DirectoryOrigin::UserOverride,
                };
            }
            info!(
                "Custom screenshot directory {} is missing, using detected default",
                custom.display()
            );
        }

        DirectoryConfig {
            path: self.detect_default(),
            origin: DirectoryOrigin::DetectedDefault,
        }
    }

    /// Persists `path` as the override. The caller checks that it is a directory.
    pub fn set_override(&mut self, path: PathBuf) -> DirectoryConfig {
        info!("Screenshot directory override set to {}", path.display());
        self.preferences.set_custom_directory(Some(path.clone()));
        DirectoryConfig {
            path,
            origin: DirectoryOrigin::UserOverride,
        }
    }

    /// Removes the override and returns the detected default.
    pub fn clear_override(&mut self) -> DirectoryConfig {
        info!("Screenshot directory override cleared");
        self.preferences.set_custom_directory(None);
        self.current_config()
    }

    /// The config path with the home prefix shown as `~`.
    pub fn display_path(&self, config: &DirectoryConfig) -> String {
        file_utils::display_path(&config.path, &self.home)
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.preferences
    }

    fn detect_default(&self) -> PathBuf {
        if let Some(raw) = self.location.screenshot_location() {
            let location = expand_tilde(&raw, &self.home);
            if location.exists() {
                return location;
            }
            debug!("Configured screenshot location {} does not exist", location.display());
        }
        self.home.join(FALLBACK_DIR_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    struct FixedLocation(Option<String>);

    impl LocationSource for FixedLocation {
        fn screenshot_location(&self) -> Option<String> {
            self.0.clone()
        }
    }

    /// Home directory with a Desktop folder and a preferences file inside it.
    fn fake_home() -> TempDir {
        let home = tempdir().expect("failed to create temp dir");
        fs::create_dir(home.path().join("Desktop")).expect("mkdir Desktop");
        home
    }

    fn resolver(home: &TempDir, location: Option<&str>) -> DirectoryResolver {
        let prefs = Preferences::open(home.path().join("prefs.json"));
        DirectoryResolver::new(
            prefs,
            home.path().to_path_buf(),
            Box::new(FixedLocation(location.map(String::from))),
        )
    }

    #[test]
    fn no_override_and_no_system_location_uses_desktop() {
        let home = fake_home();
        let config = resolver(&home, None).current_config();
        assert_eq!(config.origin, DirectoryOrigin::DetectedDefault);
        assert_eq!(config.path, home.path().join("Desktop"));
        assert!(config.path.exists());
    }

    #[test]
    fn system_location_is_tilde_expanded() {
        let home = fake_home();
        fs::create_dir(home.path().join("Shots")).expect("mkdir");
        let config = resolver(&home, Some("~/Shots")).current_config();
        assert_eq!(config.origin, DirectoryOrigin::DetectedDefault);
        assert_eq!(config.path, home.path().join("Shots"));
    }

    #[test]
    fn missing_system_location_falls_back_to_desktop() {
        let home = fake_home();
        let config = resolver(&home, Some("~/Nowhere")).current_config();
        assert_eq!(config.path, home.path().join("Desktop"));
    }

    #[test]
    fn override_persists_across_resolvers() {
        let home = fake_home();
        let custom = tempdir().expect("failed to create temp dir");

        let mut first = resolver(&home, None);
        let set = first.set_override(custom.path().to_path_buf());
        assert_eq!(set.origin, DirectoryOrigin::UserOverride);

        let config = resolver(&home, None).current_config();
        assert_eq!(
            config,
            DirectoryConfig {
                path: custom.path().to_path_buf(),
                origin: DirectoryOrigin::UserOverride,
            }
        );
    }

    #[test]
    fn clear_override_restores_detected_default() {
        let home = fake_home();
        let custom = tempdir().expect("failed to create temp dir");

        let mut first = resolver(&home, None);
        first.set_override(custom.path().to_path_buf());
        let cleared = first.clear_override();
        assert_eq!(cleared.origin, DirectoryOrigin::DetectedDefault);

        let config = resolver(&home, None).current_config();
        assert_eq!(config.origin, DirectoryOrigin::DetectedDefault);
        assert!(config.path.exists());
    }

    #[test]
    fn vanished_override_falls_through() {
        let home = fake_home();
        let mut first = resolver(&home, None);
        first.set_override(home.path().join("deleted"));

        let config = resolver(&home, None).current_config();
        assert_eq!(config.origin, DirectoryOrigin::DetectedDefault);
        assert_eq!(config.path, home.path().join("Desktop"));
    }

    #[test]
    fn display_path_uses_resolver_home() {
        let home = fake_home();
        let resolver = resolver(&home, None);
        let config = resolver.current_config();
        assert_eq!(resolver.display_path(&config), "~/Desktop");

        let outside = DirectoryConfig {
            path: PathBuf::from("/var/tmp"),
            origin: DirectoryOrigin::UserOverride,
        };
        assert_eq!(resolver.display_path(&outside), "/var/tmp");
    }
}
