// SPDX-FileCopyrightText: 2026 Recuerdo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Demo catalog: Spanish-language outdoor gear for seeding.

/// A product to seed, before embedding.
pub struct DemoProduct {
    pub name: &'static str,
    pub category: &'static str,
    pub price: f64,
    pub description: &'static str,
}

impl DemoProduct {
    /// Text sent to the embedding model: name, category, and
    /// description together, so category words count toward similarity.
    pub fn embedding_text(&self) -> String {
        format!("{} - {}: {}", self.name, self.category, self.description)
    }
}

/// Outdoor gear demo catalog.
pub const DEMO_PRODUCTS: &[DemoProduct] = &[
    DemoProduct {
        name: "Botas de Senderismo TrailBlaze",
        category: "Calzado",
        price: 149.99,
        description: "Botas de senderismo impermeables con suelas Vibram, soporte de tobillo \
                      y forro transpirable. Ideales para senderos rocosos y condiciones húmedas.",
    },
    DemoProduct {
        name: "Mochila SummitPack 40L",
        category: "Mochilas",
        price: 89.95,
        description: "Mochila ligera de 40 litros con compartimento para hidratación, cubierta \
                      de lluvia y cinturón de cadera ergonómico. Perfecta para excursiones de un \
                      día o con pernocta.",
    },
    DemoProduct {
        name: "Chaqueta de Plumón ArcticShield",
        category: "Ropa",
        price: 199.00,
        description: "Chaqueta de plumón de ganso 800-fill con clasificación de -28 °C. Incluye \
                      carcasa resistente al agua, diseño comprimible y capucha ajustable.",
    },
    DemoProduct {
        name: "Remo para Kayak RiverRun",
        category: "Deportes Acuáticos",
        price: 74.50,
        description: "Remo de fibra de vidrio para kayak con férula ajustable y anillos \
                      antigoteo. Ligero (795 g), apto para kayak recreativo y de travesía.",
    },
    DemoProduct {
        name: "Bastones de Trekking TerraFirm",
        category: "Accesorios",
        price: 59.99,
        description: "Bastones de trekking plegables de fibra de carbono con empuñaduras de \
                      corcho y puntas de tungsteno. Ajustables de 60 a 137 cm, con amortiguación \
                      anti-vibración.",
    },
    DemoProduct {
        name: "Binoculares ClearView 10x42",
        category: "Óptica",
        price: 129.00,
        description: "Binoculares de prisma de techo con aumento 10x y lentes objetivos de \
                      42 mm. Cargados con nitrógeno y resistentes al agua. Ideales para \
                      observación de aves y fauna.",
    },
    DemoProduct {
        name: "Linterna Frontal LED NightGlow",
        category: "Iluminación",
        price: 34.99,
        description: "Linterna frontal recargable de 350 lúmenes con modo de luz roja y haz \
                      ajustable. Clasificación IPX6 de resistencia al agua, hasta 40 horas en \
                      modo bajo.",
    },
    DemoProduct {
        name: "Saco de Dormir CozyNest",
        category: "Camping",
        price: 109.00,
        description: "Saco de dormir tipo momia para tres estaciones, con clasificación de \
                      -6 °C. Aislamiento sintético, saco de compresión incluido. Pesa 1.1 kg.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_catalog_has_eight_products() {
        assert_eq!(DEMO_PRODUCTS.len(), 8);
    }

    #[test]
    fn embedding_text_carries_name_category_and_description() {
        let text = DEMO_PRODUCTS[0].embedding_text();
        assert!(text.starts_with("Botas de Senderismo TrailBlaze - Calzado: "));
        assert!(text.contains("impermeables"));
    }
}
