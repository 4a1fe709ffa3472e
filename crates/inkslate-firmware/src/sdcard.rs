//! SD card mount and `FileSystem` implementation over the ESP-IDF VFS.

use std::ffi::CString;
use std::fs;
use std::io::Read;
use std::ptr;

use esp_idf_svc::hal::gpio::Pin;
use esp_idf_svc::hal::spi::SpiDriver;
use esp_idf_svc::sys;
use inkslate_core::filesystem::{FileInfo, FileSystem, FileSystemError};

const SD_MOUNT_POINT: &str = "/sd";
const SD_MAX_FILES: i32 = 8;

pub struct SdCardFs {
    base_path: String,
}

impl SdCardFs {
    pub fn new(spi: &SpiDriver, cs_pin: impl Pin) -> Result<Self, FileSystemError> {
        let base_path = SD_MOUNT_POINT.to_string();
        let c_base = CString::new(base_path.clone())
            .map_err(|_| FileSystemError::IoError("Invalid mount path".into()))?;

        let host = build_sdspi_host(spi.host());
        let slot_config = sys::sdspi_device_config_t {
            host_id: spi.host(),
            gpio_cs: cs_pin.pin(),
            gpio_cd: -1,
            gpio_wp: -1,
            gpio_int: -1,
            gpio_wp_polarity: false,
        };

        let mount_config = sys::esp_vfs_fat_mount_config_t {
            format_if_mount_failed: false,
            max_files: SD_MAX_FILES,
            allocation_unit_size: 0,
            disk_status_check_enable: false,
            use_one_fat: false,
        };

        let res = unsafe {
            sys::esp_vfs_fat_sdspi_mount(
                c_base.as_ptr(),
                &host,
                &slot_config,
                &mount_config,
                ptr::null_mut(),
            )
        };

        if res != sys::ESP_OK {
            return Err(FileSystemError::IoError(format!(
                "SD mount failed: {}",
                res
            )));
        }

        log::info!("SD card mounted at {}", base_path);
        Ok(Self { base_path })
    }

    /// Filesystem rooted at the mount point without a mounted card;
    /// every operation fails, which the note store treats as an
    /// unavailable session.
    pub fn unmounted() -> Self {
        Self {
            base_path: SD_MOUNT_POINT.to_string(),
        }
    }

    fn host_path(&self, path: &str) -> String {
        if path == "/" {
            self.base_path.clone()
        } else {
            format!("{}/{}", self.base_path, path.trim_start_matches('/'))
        }
    }
}

fn build_sdspi_host(host_id: sys::spi_host_device_t) -> sys::sdmmc_host_t {
    let mut host = unsafe { sys::sdspi_host_default() };
    host.slot = host_id as i32;
    host
}

fn to_fs_error(err: std::io::Error) -> FileSystemError {
    match err.kind() {
        std::io::ErrorKind::NotFound => FileSystemError::NotFound,
        std::io::ErrorKind::AlreadyExists => FileSystemError::AlreadyExists,
        _ => FileSystemError::IoError(format!("{:?}", err)),
    }
}

impl FileSystem for SdCardFs {
    fn list_files(&mut self, path: &str) -> Result<Vec<FileInfo>, FileSystemError> {
        let host_path = self.host_path(path);
        let read_dir = fs::read_dir(&host_path).map_err(to_fs_error)?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(to_fs_error)?;
            let meta = entry.metadata().map_err(to_fs_error)?;
            let name = entry.file_name().to_string_lossy().to_string();
            entries.push(FileInfo {
                name,
                size: if meta.is_file() { meta.len() } else { 0 },
                is_directory: meta.is_dir(),
            });
        }
        Ok(entries)
    }

    fn read_file(&mut self, path: &str) -> Result<String, FileSystemError> {
        fs::read_to_string(self.host_path(path)).map_err(to_fs_error)
    }

    fn read_file_prefix(&mut self, path: &str, max_len: usize) -> Result<String, FileSystemError> {
        let mut file = fs::File::open(self.host_path(path)).map_err(to_fs_error)?;
        let mut buffer = vec![0u8; max_len];
        let mut filled = 0;
        // FAT reads can come back short of EOF, keep pulling.
        loop {
            let read = file.read(&mut buffer[filled..]).map_err(to_fs_error)?;
            if read == 0 {
                break;
            }
            filled += read;
            if filled == buffer.len() {
                break;
            }
        }
        buffer.truncate(filled);
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    fn write_file(&mut self, path: &str, contents: &str) -> Result<(), FileSystemError> {
        fs::write(self.host_path(path), contents).map_err(to_fs_error)
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), FileSystemError> {
        // FATFS refuses to rename over an existing entry; the store
        // falls back to remove-then-rename when this fails.
        fs::rename(self.host_path(from), self.host_path(to)).map_err(to_fs_error)
    }

    fn remove_file(&mut self, path: &str) -> Result<(), FileSystemError> {
        fs::remove_file(self.host_path(path)).map_err(to_fs_error)
    }

    fn make_dir(&mut self, path: &str) -> Result<(), FileSystemError> {
        fs::create_dir(self.host_path(path)).map_err(to_fs_error)
    }

    fn exists(&mut self, path: &str) -> bool {
        fs::metadata(self.host_path(path)).is_ok()
    }

    fn file_info(&mut self, path: &str) -> Result<FileInfo, FileSystemError> {
        let host_path = self.host_path(path);
        let meta = fs::metadata(&host_path).map_err(to_fs_error)?;
        let name = inkslate_core::filesystem::basename(path).to_string();
        Ok(FileInfo {
            name,
            size: if meta.is_file() { meta.len() } else { 0 },
            is_directory: meta.is_dir(),
        })
    }
}
