mod tar_gz_packager;

pub use tar_gz_packager::{MANIFEST_FILENAME, TarGzPackager};
