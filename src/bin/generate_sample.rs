//! Writes a small offline stand-in for the datos.gob.cl dataset, in the
//! same awkward wire shape the real endpoint serves: Latin-1 bytes with a
//! semicolon separator, so the decoder's fallback path gets exercised.

use std::fs;

use anyhow::{Context, Result};
use encoding_rs::WINDOWS_1252;

const OUTPUT_PATH: &str = "sample_oficinas.csv";

const COMUNAS: [(&str, &str, &str); 8] = [
    ("Metropolitana", "Santiago", "Santiago"),
    ("Metropolitana", "Providencia", "Santiago"),
    ("Metropolitana", "Maipú", "Santiago"),
    ("Valparaíso", "Valparaíso", "Valparaíso"),
    ("Valparaíso", "Viña del Mar", "Viña del Mar"),
    ("Biobío", "Concepción", "Concepción"),
    ("Biobío", "Talcahuano", "Talcahuano"),
    ("Ñuble", "Chillán", "Chillán"),
];

const TIPOS: [&str; 3] = ["Sucursal", "Oficina", "Centro de Servicio"];

fn main() -> Result<()> {
    let mut buffer = Vec::new();
    let mut rows = 0u32;
    {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .from_writer(&mut buffer);

        writer.write_record(["Región", "Comuna", "Ciudad", "Tipo", "Dirección", "Teléfono"])?;

        for (i, &(region, comuna, ciudad)) in COMUNAS.iter().enumerate() {
            for (j, &tipo) in TIPOS.iter().enumerate() {
                let direccion = format!("Av. Libertador {}", 100 + i * 10 + j);
                // Every ninth record ships without a phone, like the real data.
                let telefono = if (i + j) % 9 == 8 {
                    String::new()
                } else {
                    format!("2{}{:04}", 2 + i, 1100 + i * 31 + j * 7)
                };
                writer.write_record([
                    region,
                    comuna,
                    ciudad,
                    tipo,
                    direccion.as_str(),
                    telefono.as_str(),
                ])?;
                rows += 1;
            }
        }

        writer.flush().context("finishing CSV writer")?;
    }
    let text = String::from_utf8(buffer).context("CSV writer produced invalid UTF-8")?;

    let (encoded, _, _) = WINDOWS_1252.encode(&text);
    fs::write(OUTPUT_PATH, &encoded).with_context(|| format!("writing {OUTPUT_PATH}"))?;

    println!("Wrote {rows} rows to {OUTPUT_PATH}");
    Ok(())
}
