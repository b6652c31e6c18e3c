use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    ffi::CString,
    fs::{self, File},
    io::{self, BufReader, Cursor, Read},
    os::unix::ffi::OsStrExt,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    time::Instant,
};

pub use self::{clock::*, stats::*};

mod clock {
    use super::*;

    pub trait Clock {
        fn now(&self) -> Instant;
    }

    #[derive(Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> Instant {
            Instant::now()
        }
    }

    /// a mock clock, yielding a queue of instants.
    #[derive(Default)]
    #[allow(dead_code, reason = "this is a testing utility.")]
    pub struct MockClock {
        times: RefCell<VecDeque<Instant>>,
    }

    #[allow(dead_code, reason = "this is a testing utility.")]
    impl MockClock {
        pub fn new(times: impl IntoIterator<Item = Instant>) -> Self {
            Self {
                times: RefCell::new(times.into_iter().collect()),
            }
        }
    }

    impl Clock for MockClock {
        fn now(&self) -> Instant {
            let MockClock { times } = self;

            times
                .borrow_mut()
                .pop_front()
                .expect("mock times should not be empty")
        }
    }
}

/// abstracts over providers of kernel statistics.
mod stats {
    use super::*;

    /// a source of kernel statistics.
    pub trait StatsSource {
        /// returns a reader for the pseudo-file at `path`.
        fn open(&self, path: &Path) -> io::Result<impl Read>;

        /// lists the names of the entries in the directory at `path`.
        fn list(&self, path: &Path) -> io::Result<Vec<String>>;

        /// returns raw usage counters for the filesystem mounted at `path`.
        fn statvfs(&self, path: &Path) -> io::Result<FsStat>;

        /// runs an external utility, returning what it printed.
        fn run(&self, program: &str, args: &[&str]) -> io::Result<String>;

        /// the number of clock ticks in a second, `sysconf(_SC_CLK_TCK)`.
        fn clock_ticks(&self) -> u64;

        /// the size of a memory page in bytes, `sysconf(_SC_PAGESIZE)`.
        fn page_size(&self) -> u64;

        /// reads the whole pseudo-file at `path`.
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            let mut contents = String::new();
            self.open(path)?.read_to_string(&mut contents)?;
            Ok(contents)
        }
    }

    /// raw filesystem counters, as reported by `statvfs(3)`.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct FsStat {
        /// the fragment size, which `blocks` are counted in.
        pub fragment_size: u64,
        pub blocks: u64,
        /// blocks available to unprivileged users.
        pub blocks_available: u64,
        pub files: u64,
        /// inodes available to unprivileged users.
        pub files_available: u64,
    }

    /// statistics backed by the live system.
    #[derive(Default)]
    pub struct ProcFs;

    /// a mock stat source.
    ///
    /// each file holds a queue of contents. reads pop the front of the queue, and the last
    /// element is sticky.
    #[allow(dead_code, reason = "this is a testing utility.")]
    pub struct MockStats {
        files: RefCell<HashMap<PathBuf, VecDeque<String>>>,
        dirs: HashMap<PathBuf, Vec<String>>,
        commands: HashMap<String, String>,
        fs: Option<FsStat>,
        clock_ticks: u64,
        page_size: u64,
    }

    // === impl ProcFs ===

    impl StatsSource for ProcFs {
        fn open(&self, path: &Path) -> io::Result<impl Read> {
            File::open(path).map(BufReader::new)
        }

        fn list(&self, path: &Path) -> io::Result<Vec<String>> {
            fs::read_dir(path)?
                .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
                .collect()
        }

        fn statvfs(&self, path: &Path) -> io::Result<FsStat> {
            let path = CString::new(path.as_os_str().as_bytes())
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

            // SAFETY: `path` is a valid nul-terminated string, and `stat` is a plain struct that
            // `statvfs` fully initializes when it returns zero.
            let stat = unsafe {
                let mut stat: libc::statvfs = std::mem::zeroed();
                if libc::statvfs(path.as_ptr(), &mut stat) != 0 {
                    return Err(io::Error::last_os_error());
                }
                stat
            };

            // field widths vary by platform.
            Ok(FsStat {
                fragment_size: stat.f_frsize as u64,
                blocks: stat.f_blocks as u64,
                blocks_available: stat.f_bavail as u64,
                files: stat.f_files as u64,
                files_available: stat.f_favail as u64,
            })
        }

        fn run(&self, program: &str, args: &[&str]) -> io::Result<String> {
            let output = Command::new(program)
                .args(args)
                .stdin(Stdio::null())
                .stderr(Stdio::null())
                .output()?;

            if !output.status.success() {
                return Err(io::Error::other(format!(
                    "{program} exited with {}",
                    output.status
                )));
            }

            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        }

        fn clock_ticks(&self) -> u64 {
            Self::sysconf(libc::_SC_CLK_TCK).unwrap_or(Self::CLOCK_TICKS)
        }

        fn page_size(&self) -> u64 {
            Self::sysconf(libc::_SC_PAGESIZE).unwrap_or(Self::PAGE_SIZE)
        }
    }

    impl ProcFs {
        /// usually, the kernel counts time in units of 100Hz.
        const CLOCK_TICKS: u64 = 100;
        const PAGE_SIZE: u64 = 4096;

        fn sysconf(name: libc::c_int) -> Option<u64> {
            // SAFETY: sysconf has no preconditions. it returns -1 on error and 0 when the value
            // is undefined, both of which are rejected below.
            let value = unsafe { libc::sysconf(name) };
            u64::try_from(value).ok().filter(|v| *v > 0)
        }
    }

    // === impl MockStats ===

    impl Default for MockStats {
        fn default() -> Self {
            Self {
                files: RefCell::default(),
                dirs: HashMap::default(),
                commands: HashMap::default(),
                fs: None,
                clock_ticks: 100,
                page_size: 4096,
            }
        }
    }

    #[allow(dead_code, reason = "this is a testing utility.")]
    impl MockStats {
        /// queues the contents of a file, one element per read.
        pub fn file<I>(self, path: &str, contents: I) -> Self
        where
            I: IntoIterator,
            I::Item: Into<String>,
        {
            let contents = contents.into_iter().map(Into::into).collect();
            self.files.borrow_mut().insert(PathBuf::from(path), contents);
            self
        }

        pub fn dir(mut self, path: &str, entries: &[&str]) -> Self {
            let entries = entries.iter().map(|e| e.to_string()).collect();
            self.dirs.insert(PathBuf::from(path), entries);
            self
        }

        pub fn command(mut self, program: &str, output: &str) -> Self {
            self.commands.insert(program.to_owned(), output.to_owned());
            self
        }

        pub fn fs(mut self, stat: FsStat) -> Self {
            self.fs = Some(stat);
            self
        }

        fn not_found(what: impl std::fmt::Debug) -> io::Error {
            io::Error::new(io::ErrorKind::NotFound, format!("{what:?} is not mocked"))
        }
    }

    impl StatsSource for MockStats {
        fn open(&self, path: &Path) -> io::Result<impl Read> {
            let Self { files, .. } = self;

            let mut files = files.borrow_mut();
            let queue = files
                .get_mut(path)
                .filter(|q| !q.is_empty())
                .ok_or_else(|| Self::not_found(path))?;
            let contents = if queue.len() > 1 {
                queue.pop_front().unwrap_or_default()
            } else {
                queue.front().cloned().unwrap_or_default()
            };

            Ok(Cursor::new(contents))
        }

        fn list(&self, path: &Path) -> io::Result<Vec<String>> {
            self.dirs
                .get(path)
                .cloned()
                .ok_or_else(|| Self::not_found(path))
        }

        fn statvfs(&self, path: &Path) -> io::Result<FsStat> {
            self.fs.ok_or_else(|| Self::not_found(path))
        }

        fn run(&self, program: &str, _: &[&str]) -> io::Result<String> {
            self.commands
                .get(program)
                .cloned()
                .ok_or_else(|| Self::not_found(program))
        }

        fn clock_ticks(&self) -> u64 {
            self.clock_ticks
        }

        fn page_size(&self) -> u64 {
            self.page_size
        }
    }
}
