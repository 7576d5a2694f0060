//! CSV snapshots of the customer and reservation stores.
//!
//! A data directory holds one file per store:
//! - `customers.csv` (`id,guestName,amount`)
//! - `reservations.csv` (`id,guestName,checkInDate,checkOutDate,numberOfGuests,roomType,amount`)
//! - `.lock`, held exclusively by the process that has the directory open
//!
//! Snapshots are read with csv-async on tokio. Fields are read back verbatim,
//! whitespace included. A save writes both temporary files before renaming
//! either, so a failed write leaves the previous pair of snapshots in place.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use csv_async::AsyncReaderBuilder;
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs::{self, File};
use tokio_stream::StreamExt;
use tracing::debug;

use crate::csv_utils::write_csv;
use crate::{Customer, Error, Reservation};

pub const CUSTOMERS_FILE: &str = "customers.csv";
pub const RESERVATIONS_FILE: &str = "reservations.csv";
pub const LOCK_FILE: &str = ".lock";

#[derive(Debug, Clone)]
pub struct SnapshotDir {
    root: PathBuf,
}

/// Exclusive advisory lock on a data directory. Released on drop.
#[derive(Debug)]
pub struct DirLock {
    _file: std::fs::File,
}

impl SnapshotDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Waits until no other handle holds the directory, then locks it.
    ///
    /// Every load-modify-save cycle must run while holding the lock, otherwise
    /// two processes can overwrite each other's snapshot.
    pub async fn lock(&self) -> Result<DirLock, Error> {
        fs::create_dir_all(&self.root).await?;
        let path = self.root.join(LOCK_FILE);
        let file = tokio::task::spawn_blocking(move || -> std::io::Result<std::fs::File> {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(&path)?;
            FileExt::lock_exclusive(&file)?;
            Ok(file)
        })
        .await
        .map_err(std::io::Error::other)??;
        debug!(root = %self.root.display(), "Locked data directory");
        Ok(DirLock { _file: file })
    }

    pub async fn load_customers(&self) -> Result<Vec<Customer>, Error> {
        read_records(&self.root.join(CUSTOMERS_FILE)).await
    }

    pub async fn load_reservations(&self) -> Result<Vec<Reservation>, Error> {
        read_records(&self.root.join(RESERVATIONS_FILE)).await
    }

    /// Replaces both snapshots.
    ///
    /// Both files are fully written to temporary paths first; the renames only
    /// start once every write succeeded.
    pub async fn save(
        &self,
        customers: &[Customer],
        reservations: &[Reservation],
    ) -> Result<(), Error> {
        fs::create_dir_all(&self.root).await?;
        let customers_tmp = self.write_temp(CUSTOMERS_FILE, customers).await?;
        let reservations_tmp = self.write_temp(RESERVATIONS_FILE, reservations).await?;

        fs::rename(&customers_tmp, self.root.join(CUSTOMERS_FILE)).await?;
        fs::rename(&reservations_tmp, self.root.join(RESERVATIONS_FILE)).await?;

        debug!(
            root = %self.root.display(),
            customers = customers.len(),
            reservations = reservations.len(),
            "Saved snapshots"
        );
        Ok(())
    }

    async fn write_temp<T: Serialize>(
        &self,
        file_name: &str,
        records: &[T],
    ) -> Result<PathBuf, Error> {
        let tmp = self.root.join(file_name).with_extension("csv.tmp");
        let mut buffer = Vec::new();
        write_csv(&mut buffer, records.iter())?;
        fs::write(&tmp, &buffer).await?;
        Ok(tmp)
    }
}

/// Reads every record of a snapshot file. A missing file yields no records.
async fn read_records<T>(path: &Path) -> Result<Vec<T>, Error>
where
    T: DeserializeOwned + 'static,
{
    let file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No snapshot found, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };
    let mut csv_reader = AsyncReaderBuilder::new()
        .has_headers(true)
        .create_deserializer(file);

    let mut rows = csv_reader.deserialize::<T>();
    let mut records = Vec::new();
    while let Some(row) = rows.next().await {
        // A malformed row means the snapshot cannot be trusted
        records.push(row?);
    }
    debug!(path = %path.display(), records = records.len(), "Loaded snapshot");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IdentifierSource, OsRandomSource};

    fn customer(name: &str, amount: Option<u64>) -> Customer {
        Customer {
            id: OsRandomSource.generate().unwrap(),
            guest_name: name.to_string(),
            amount,
        }
    }

    #[tokio::test]
    async fn test_missing_files_load_empty() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let snapshots = SnapshotDir::new(dir.path().join("never-created"));
        assert!(snapshots.load_customers().await?.is_empty());
        assert!(snapshots.load_reservations().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_save_then_load() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let snapshots = SnapshotDir::new(dir.path());

        let customers = vec![customer("Alice", Some(100)), customer("", Some(0))];
        let reservations = vec![Reservation {
            id: OsRandomSource.generate()?,
            guest_name: "Bob".to_string(),
            check_in_date: "2024-05-01".to_string(),
            check_out_date: "2024-05-02".to_string(),
            number_of_guests: 1,
            room_type: "single".to_string(),
            amount: 80,
        }];
        snapshots.save(&customers, &reservations).await?;

        assert_eq!(snapshots.load_customers().await?, customers);
        assert_eq!(snapshots.load_reservations().await?, reservations);
        assert!(!dir.path().join("customers.csv.tmp").exists());
        assert!(!dir.path().join("reservations.csv.tmp").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_whitespace_survives_reload() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let snapshots = SnapshotDir::new(dir.path());

        let customers = vec![customer("  Alice ", Some(1)), customer(" ", None)];
        let reservations = vec![Reservation {
            id: OsRandomSource.generate()?,
            guest_name: "\tBob  ".to_string(),
            check_in_date: " 2024-05-01".to_string(),
            check_out_date: "2024-05-02 ".to_string(),
            number_of_guests: 3,
            room_type: "  double suite  ".to_string(),
            amount: 80,
        }];
        snapshots.save(&customers, &reservations).await?;

        assert_eq!(snapshots.load_customers().await?, customers);
        assert_eq!(snapshots.load_reservations().await?, reservations);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_replaces_previous_snapshot() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let snapshots = SnapshotDir::new(dir.path());

        snapshots.save(&[customer("Alice", Some(1))], &[]).await?;
        let latest = vec![customer("Bob", Some(2))];
        snapshots.save(&latest, &[]).await?;

        assert_eq!(snapshots.load_customers().await?, latest);
        Ok(())
    }

    #[tokio::test]
    async fn test_lock_is_exclusive_until_dropped() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let snapshots = SnapshotDir::new(dir.path());
        let first = snapshots.lock().await?;

        let contender = tokio::spawn({
            let snapshots = snapshots.clone();
            async move { snapshots.lock().await }
        });
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        assert!(!contender.is_finished());

        drop(first);
        let _second = contender.await.unwrap()?;
        assert!(snapshots.root().join(LOCK_FILE).exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_load_fixture() -> Result<(), Error> {
        let snapshots = SnapshotDir::new("data");

        let customers = snapshots.load_customers().await?;
        assert_eq!(customers.len(), 3);
        assert_eq!(customers[0].guest_name, "Alice");
        assert_eq!(customers[0].amount, Some(100));
        // Row without an amount loads as an incomplete record
        assert_eq!(customers[2].guest_name, "Carol");
        assert_eq!(customers[2].amount, None);

        let reservations = snapshots.load_reservations().await?;
        assert_eq!(reservations.len(), 2);
        assert_eq!(reservations[1].room_type, "suite");
        assert_eq!(reservations[1].number_of_guests, 4);
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_row_is_an_error() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        std::fs::write(
            dir.path().join(CUSTOMERS_FILE),
            "id,guestName,amount\nnot-an-id,Alice,100\n",
        )?;
        let result = SnapshotDir::new(dir.path()).load_customers().await;
        assert!(matches!(result, Err(Error::AsyncCsv(_))));
        Ok(())
    }
}
