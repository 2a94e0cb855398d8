//! Portuguese prompt templates and the per-type/per-difficulty request plan.

use questgen_core::{DifficultyLevel, GenerationParameters, QuestionType};

pub const SYSTEM_PROMPT: &str = "\
Você é um especialista em criação de questões acadêmicas para o ensino superior brasileiro.
Sua tarefa é gerar questões de alta qualidade baseadas no conteúdo fornecido.

REGRAS IMPORTANTES:
1. Todas as questões DEVEM ser baseadas EXCLUSIVAMENTE no conteúdo fornecido
2. NÃO invente informações que não estejam no texto
3. Use linguagem acadêmica formal em português brasileiro
4. Para múltipla escolha: crie distratores plausíveis mas claramente incorretos
5. Sempre forneça justificativa para a resposta correta
6. Adapte a complexidade ao nível de dificuldade solicitado";

const DEFAULT_TOPIC: &str = "Geral";

/// One line of the request plan: ask for `count` questions of this shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedBatch {
    pub question_type: QuestionType,
    pub difficulty: DifficultyLevel,
    pub count: usize,
}

/// Split `num_questions` evenly across the requested types (the remainder
/// goes to the first types), then each type's share across difficulties
/// as `floor(type_count × ratio)`. Batches with a zero count are omitted,
/// so the planned total can fall short of the request.
pub fn plan_distribution(params: &GenerationParameters) -> Vec<PlannedBatch> {
    let types = &params.question_types;
    if types.is_empty() {
        return Vec::new();
    }

    let per_type = params.num_questions / types.len();
    let remainder = params.num_questions % types.len();

    let mut plan = Vec::new();
    for (i, &question_type) in types.iter().enumerate() {
        let type_count = per_type + usize::from(i < remainder);
        for (&difficulty, &ratio) in &params.difficulty_distribution {
            let count = (type_count as f64 * ratio.max(0.0)).floor() as usize;
            if count > 0 {
                plan.push(PlannedBatch { question_type, difficulty, count });
            }
        }
    }
    plan
}

/// User prompt asking for exactly one question in the reply format
/// the parser expects for `question_type`.
pub fn question_prompt(
    context: &str,
    question_type: QuestionType,
    difficulty: DifficultyLevel,
    topic: &str,
) -> String {
    let topic = if topic.is_empty() { DEFAULT_TOPIC } else { topic };
    let level = difficulty.prompt_label().to_lowercase();
    let header = format!(
        "CONTEXTO:\n{context}\n\nTÓPICO: {topic}\nDIFICULDADE: {}\n\n",
        difficulty.prompt_label()
    );

    let body = match question_type {
        QuestionType::MultipleChoice => format!(
            "Gere UMA questão de MÚLTIPLA ESCOLHA seguindo este formato EXATO:\n\n\
             QUESTÃO: [enunciado claro e objetivo]\n\
             A) [alternativa A]\n\
             B) [alternativa B]\n\
             C) [alternativa C]\n\
             D) [alternativa D]\n\
             RESPOSTA: [apenas a letra: A, B, C ou D]\n\
             JUSTIFICATIVA: [explicação de 2-3 frases do porquê a resposta está correta]\n\n\
             Regras:\n\
             - O enunciado deve ser claro e sem ambiguidade\n\
             - Apenas UMA alternativa deve estar correta\n\
             - Distratores devem ser plausíveis mas incorretos\n\
             - Nível {level}: {}\n",
            level_focus(question_type, difficulty)
        ),
        QuestionType::TrueFalse => format!(
            "Gere UMA questão de VERDADEIRO ou FALSO seguindo este formato EXATO:\n\n\
             AFIRMAÇÃO: [uma afirmação clara que pode ser verdadeira ou falsa]\n\
             RESPOSTA: [apenas V ou F]\n\
             JUSTIFICATIVA: [explicação de 2-3 frases justificando a resposta]\n\n\
             Regras:\n\
             - A afirmação deve ser objetiva e verificável no contexto\n\
             - Evite afirmações obviamente verdadeiras ou falsas\n\
             - Nível {level}: {}\n",
            level_focus(question_type, difficulty)
        ),
        QuestionType::Essay => format!(
            "Gere UMA questão DISSERTATIVA seguindo este formato EXATO:\n\n\
             QUESTÃO: [pergunta aberta que exige resposta elaborada]\n\
             RESPOSTA_ESPERADA: [pontos principais que devem constar na resposta - em tópicos]\n\
             CRITÉRIOS: [critérios de avaliação da resposta]\n\n\
             Regras:\n\
             - A questão deve estimular análise e reflexão\n\
             - A resposta esperada deve listar 3-5 pontos principais\n\
             - Nível {level}: {}\n",
            level_focus(question_type, difficulty)
        ),
    };

    header + &body
}

fn level_focus(question_type: QuestionType, difficulty: DifficultyLevel) -> &'static str {
    use DifficultyLevel::*;
    match (question_type, difficulty) {
        (QuestionType::MultipleChoice, Easy) => "conceitos básicos e definições",
        (QuestionType::MultipleChoice, Medium) => "aplicação e análise",
        (QuestionType::MultipleChoice, Hard) => "síntese e avaliação crítica",
        (QuestionType::TrueFalse, Easy) => "afirmações diretas do texto",
        (QuestionType::TrueFalse, Medium) => "inferências moderadas",
        (QuestionType::TrueFalse, Hard) => "análise crítica de conceitos",
        (QuestionType::Essay, Easy) => "descrição e explicação",
        (QuestionType::Essay, Medium) => "comparação e aplicação",
        (QuestionType::Essay, Hard) => "avaliação e proposta de soluções",
    }
}
