use crate::models::{Category, CategoryStatus};

// (id, name, description, unsplash photo, color, active, created_at)
const SEED: [(&str, &str, &str, &str, &str, bool, &str); 10] = [
    ("cat-001", "Medio Ambiente", "Acciones relacionadas con el cuidado del medio ambiente y la naturaleza", "1542601906990-b4d3fb778b09", "#10B981", true, "2024-01-15T10:30:00Z"),
    ("cat-002", "Educación", "Iniciativas educativas y de formación para la comunidad", "1503676260728-1c00da094a0b", "#3B82F6", true, "2024-01-16T14:20:00Z"),
    ("cat-003", "Salud", "Acciones de promoción de la salud y bienestar comunitario", "1505751172876-fa1923c5c528", "#EF4444", true, "2024-01-17T09:15:00Z"),
    ("cat-004", "Cultura", "Eventos y actividades culturales para promover las artes", "1460661419201-fd4cecdf8a8b", "#8B5CF6", true, "2024-01-18T16:45:00Z"),
    ("cat-005", "Deporte", "Actividades deportivas y recreativas para todas las edades", "1461896836934-ffe607ba8211", "#F59E0B", false, "2024-01-19T11:30:00Z"),
    ("cat-006", "Alimentación", "Programas de ayuda alimentaria y bancos de alimentos", "1498837167922-ddd27525d352", "#EC4899", true, "2024-01-20T13:00:00Z"),
    ("cat-007", "Tecnología", "Alfabetización digital y acceso a tecnología", "1488590528505-98d2b5aba04b", "#06B6D4", true, "2024-01-21T10:00:00Z"),
    ("cat-008", "Animales", "Protección y cuidado de animales en situación de vulnerabilidad", "1450778869180-41d0601e046e", "#F97316", true, "2024-01-22T08:30:00Z"),
    ("cat-009", "Vivienda", "Mejoramiento de viviendas y construcción de hogares", "1560518883-ce09059eeffa", "#14B8A6", false, "2024-01-23T15:20:00Z"),
    ("cat-010", "Emprendimiento", "Apoyo a emprendedores y pequeños negocios locales", "1556761175-b413da4baf72", "#6366F1", true, "2024-01-24T12:00:00Z"),
];

/// Demo categories served by the mock backend.
pub fn sample_categories() -> Vec<Category> {
    SEED.iter()
        .map(|(id, name, description, photo, color, active, created_at)| Category {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            icon: format!("https://images.unsplash.com/photo-{photo}?w=100&h=100&fit=crop"),
            color: color.to_string(),
            status: CategoryStatus::from_active(*active),
            created_at: created_at.to_string(),
        })
        .collect()
}
