// src/common/i18n.rs

use std::collections::HashMap;

// Idioma padrão do produto (painel em espanhol)
pub const DEFAULT_LANG: &str = "es";

// Dicionário em memória: idioma -> (código do erro -> mensagem).
// Carregado uma vez no AppState e compartilhado por Arc.
pub struct I18nStore {
    messages: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut m = HashMap::new();

        // (lang, code) -> mensagem
        let entries: &[(&str, &str, &str)] = &[
            // --- es ---
            ("es", "validation_error", "Uno o más campos son inválidos."),
            ("es", "email_already_exists", "Este correo ya está en uso."),
            ("es", "invalid_credentials", "Correo o contraseña inválidos."),
            ("es", "invalid_token", "Token de autenticación inválido o ausente."),
            ("es", "user_not_found", "Usuario no encontrado."),
            ("es", "profile_not_found", "Perfil no encontrado."),
            ("es", "student_not_found", "Alumno no encontrado."),
            ("es", "service_not_found", "Servicio no encontrado."),
            ("es", "plan_not_found", "Plan no encontrado."),
            ("es", "appointment_not_found", "Clase no encontrada."),
            ("es", "organization_not_found", "Organización no encontrada."),
            ("es", "organization_access_denied", "Sin acceso a esta organización."),
            ("es", "insufficient_role", "Tu rol no permite esta operación."),
            ("es", "teacher_selection_invalid", "Selecciona un maestro interno o externo, no ambos."),
            ("es", "empty_attendee_list", "Selecciona al menos un alumno."),
            ("es", "unique_violation", "El registro ya existe."),
            ("es", "internal_error", "Ocurrió un error inesperado."),
            // --- en ---
            ("en", "validation_error", "One or more fields are invalid."),
            ("en", "email_already_exists", "This e-mail is already in use."),
            ("en", "invalid_credentials", "Invalid e-mail or password."),
            ("en", "invalid_token", "Missing or invalid authentication token."),
            ("en", "user_not_found", "User not found."),
            ("en", "profile_not_found", "Profile not found."),
            ("en", "student_not_found", "Student not found."),
            ("en", "service_not_found", "Service not found."),
            ("en", "plan_not_found", "Plan not found."),
            ("en", "appointment_not_found", "Appointment not found."),
            ("en", "organization_not_found", "Organization not found."),
            ("en", "organization_access_denied", "No access to this organization."),
            ("en", "insufficient_role", "Your role does not allow this operation."),
            ("en", "teacher_selection_invalid", "Select an internal or external teacher, not both."),
            ("en", "empty_attendee_list", "Select at least one student."),
            ("en", "unique_violation", "The record already exists."),
            ("en", "internal_error", "An unexpected error occurred."),
            // --- pt ---
            ("pt", "validation_error", "Um ou mais campos são inválidos."),
            ("pt", "email_already_exists", "Este e-mail já está em uso."),
            ("pt", "invalid_credentials", "E-mail ou senha inválidos."),
            ("pt", "invalid_token", "Token de autenticação inválido ou ausente."),
            ("pt", "user_not_found", "Usuário não encontrado."),
            ("pt", "profile_not_found", "Perfil não encontrado."),
            ("pt", "student_not_found", "Aluno não encontrado."),
            ("pt", "service_not_found", "Serviço não encontrado."),
            ("pt", "plan_not_found", "Plano não encontrado."),
            ("pt", "appointment_not_found", "Aula não encontrada."),
            ("pt", "organization_not_found", "Organização não encontrada."),
            ("pt", "organization_access_denied", "Sem acesso a esta organização."),
            ("pt", "insufficient_role", "Seu papel não permite esta operação."),
            ("pt", "teacher_selection_invalid", "Selecione um professor interno ou externo, não ambos."),
            ("pt", "empty_attendee_list", "Selecione ao menos um aluno."),
            ("pt", "unique_violation", "O registro já existe."),
            ("pt", "internal_error", "Ocorreu um erro inesperado."),
        ];

        for (lang, code, msg) in entries {
            m.entry(*lang)
                .or_insert_with(HashMap::new)
                .insert(*code, *msg);
        }

        Self { messages: m }
    }

    // Busca com fallback: idioma pedido -> idioma padrão -> o próprio código
    pub fn message(&self, lang: &str, code: &str) -> String {
        self.messages
            .get(lang)
            .and_then(|table| table.get(code))
            .or_else(|| {
                self.messages
                    .get(DEFAULT_LANG)
                    .and_then(|table| table.get(code))
            })
            .map(|msg| (*msg).to_string())
            .unwrap_or_else(|| code.to_string())
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}
