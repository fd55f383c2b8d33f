pub mod bewegung;
pub mod kunde;
pub mod material;
pub mod posten;
pub mod saldo;
pub mod schuld;

pub use bewegung::{BewegungBar, BewegungKombi, BewegungNeu, BewegungsArt};
pub use kunde::{Kunde, KundeAenderung};
pub use material::{Material, MaterialAenderung, MaterialNeu};
pub use posten::{
    PostenMat, PostenMatAenderung, PostenMatNeu, PostenNoMat, PostenNoMatAenderung, PostenNoMatNeu,
};
pub use saldo::{lage_for, outstanding, status_for, Zahlungslage, Zahlungsstatus};
pub use schuld::{Schuld, SchuldAenderung, SchuldNeu};
