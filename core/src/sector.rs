//! The fixed 18-sector economic classification used for SME credit
//! reporting. The set, its display order, and the panel colors are
//! defined at process start and never change at runtime.

use crate::types::SectorIdx;

pub const SECTOR_COUNT: usize = 18;

/// One economic sector: display label plus the two colors the
/// presentation layer renders its panel with (fill and text).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sector {
    pub idx:        SectorIdx,
    pub label:      &'static str,
    pub fill_color: &'static str,
    pub text_color: &'static str,
}

/// Display order of the sectors. Feature-encoding order for the model
/// artifact is a separate table owned by the predictor adapter.
pub const SECTORS: [Sector; SECTOR_COUNT] = [
    Sector { idx: 0,  label: "Pertanian, Perburuan dan Kehutanan",                                  fill_color: "#e8f5e9", text_color: "#1b5e20" },
    Sector { idx: 1,  label: "Perikanan",                                                           fill_color: "#e1f5fe", text_color: "#01579b" },
    Sector { idx: 2,  label: "Pertambangan dan Penggalian",                                         fill_color: "#efebe9", text_color: "#3e2723" },
    Sector { idx: 3,  label: "Industri Pengolahan",                                                 fill_color: "#ede7f6", text_color: "#311b92" },
    Sector { idx: 4,  label: "Listrik, Gas dan Air",                                                fill_color: "#fffde7", text_color: "#f57f17" },
    Sector { idx: 5,  label: "Konstruksi",                                                          fill_color: "#fbe9e7", text_color: "#bf360c" },
    Sector { idx: 6,  label: "Perdagangan Besar dan Eceran",                                        fill_color: "#e3f2fd", text_color: "#0d47a1" },
    Sector { idx: 7,  label: "Penyediaan Akomodasi dan Makan Minum",                                fill_color: "#fce4ec", text_color: "#880e4f" },
    Sector { idx: 8,  label: "Transportasi, Pergudangan dan Komunikasi",                            fill_color: "#e0f2f1", text_color: "#004d40" },
    Sector { idx: 9,  label: "Perantara Keuangan",                                                  fill_color: "#f3e5f5", text_color: "#4a148c" },
    Sector { idx: 10, label: "Real Estate, Usaha Persewaan dan Jasa Perusahaan",                    fill_color: "#eceff1", text_color: "#263238" },
    Sector { idx: 11, label: "Administrasi Pemerintahan, Pertahanan dan Jaminan Sosial Wajib",      fill_color: "#212121", text_color: "#fafafa" },
    Sector { idx: 12, label: "Jasa Pendidikan",                                                     fill_color: "#fff3e0", text_color: "#e65100" },
    Sector { idx: 13, label: "Jasa Kesehatan dan Kegiatan Sosial",                                  fill_color: "#ffebee", text_color: "#b71c1c" },
    Sector { idx: 14, label: "Jasa Kemasyarakatan, Sosial Budaya, Hiburan dan Perorangan Lainnya",  fill_color: "#f1f8e9", text_color: "#33691e" },
    Sector { idx: 15, label: "Jasa Perorangan yang Melayani Rumah Tangga",                          fill_color: "#ffe0b2", text_color: "#4e342e" },
    Sector { idx: 16, label: "Badan Internasional dan Badan Ekstra Internasional Lainnya",          fill_color: "#37474f", text_color: "#eceff1" },
    Sector { idx: 17, label: "Kegiatan yang Belum Jelas Batasannya",                                fill_color: "#f5f5f5", text_color: "#424242" },
];

pub fn sector(idx: SectorIdx) -> Option<&'static Sector> {
    SECTORS.get(idx)
}

/// Resolve a dataset label back to its sector index.
pub fn sector_by_label(label: &str) -> Option<SectorIdx> {
    SECTORS.iter().position(|s| s.label == label)
}
